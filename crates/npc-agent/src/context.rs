//! Borrowed views handed to an agent for one tick.

use npc_core::{TargetInfo, TargetLocator, Tick};
use npc_spatial::NavQuery;

use crate::{AgentBody, Command};

/// World services for one agent tick.  Everything is read-only, so one
/// context is shared by every agent in the tick (and across threads).
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    pub nav: &'a dyn NavQuery,
    pub targets: &'a dyn TargetLocator,
    pub tick: Tick,
    /// Seconds per tick.
    pub dt: f32,
}

impl<'a> TickContext<'a> {
    pub fn new(nav: &'a dyn NavQuery, targets: &'a dyn TargetLocator, tick: Tick, dt: f32) -> Self {
        Self { nav, targets, tick, dt }
    }
}

/// What conditions read and actions write during one tree pass.
pub struct BrainContext<'a> {
    pub body: &'a AgentBody,
    pub nav: &'a dyn NavQuery,
    /// The target the sensor saw this tick, if any.
    pub target: Option<&'a TargetInfo>,
    /// Seconds since the previous tree pass.
    pub elapsed: f32,
    pub commands: Vec<Command>,
}

impl<'a> BrainContext<'a> {
    #[inline]
    pub fn issue(&mut self, command: Command) {
        self.commands.push(command);
    }
}
