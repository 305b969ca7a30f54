//! Fluent construction of a single agent.
//!
//! ```rust
//! use npc_agent::AgentBuilder;
//! use npc_core::{AgentId, Archetype, Vec3};
//!
//! let agent = AgentBuilder::new(Archetype::Grunt)
//!     .position(Vec3::flat(0.0, 0.0))
//!     .patrol(vec![Vec3::flat(0.0, 0.0), Vec3::flat(5.0, 0.0)])
//!     .seed(7)
//!     .build(AgentId(0))
//!     .unwrap();
//!
//! assert_eq!(agent.health(), agent.max_health());
//! ```

use npc_behavior::DecisionTree;
use npc_core::{AgentId, AgentRng, Archetype, BehaviorState, Vec3};
use npc_engagement::Engagement;
use npc_locomotion::{Locomotion, LocomotionError};
use npc_sensor::Sensor;

use crate::templates::{template, uses_patrol, AgentTreeSpec};
use crate::{Agent, AgentBody, AgentError, AgentResult, ArchetypeParams, Gait};

/// Validates configuration and assembles an [`Agent`].
///
/// Configuration mistakes (invalid parameters, a patrolling tree without
/// patrol points, an empty composite) surface here, at spawn time.
#[derive(Clone, Debug)]
pub struct AgentBuilder {
    params: ArchetypeParams,
    position: Vec3,
    facing: Vec3,
    patrol: Vec<Vec3>,
    tree: Option<AgentTreeSpec>,
    seed: u64,
}

impl AgentBuilder {
    /// Built-in parameters and tree for `archetype`.
    pub fn new(archetype: Archetype) -> Self {
        Self::with_params(ArchetypeParams::for_archetype(archetype))
    }

    pub fn with_params(params: ArchetypeParams) -> Self {
        Self {
            params,
            position: Vec3::ZERO,
            facing: Vec3::FORWARD,
            patrol: Vec::new(),
            tree: None,
            seed: 0,
        }
    }

    pub fn archetype(&self) -> Archetype {
        self.params.archetype
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Initial facing; normalized on the horizontal plane.
    pub fn facing(mut self, facing: Vec3) -> Self {
        self.facing = facing;
        self
    }

    pub fn patrol(mut self, points: Vec<Vec3>) -> Self {
        self.patrol = points;
        self
    }

    /// Replace the archetype's built-in tree.
    pub fn tree(mut self, spec: AgentTreeSpec) -> Self {
        self.tree = Some(spec);
        self
    }

    /// Global seed; the agent's RNG mixes it with its id.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self, id: AgentId) -> AgentResult<Agent> {
        let archetype = self.params.archetype;
        self.params.validate()?;

        let spec = self.tree.unwrap_or_else(|| template(archetype));
        let patrols = uses_patrol(&spec);
        let tree = DecisionTree::new(spec)?;

        let locomotion = Locomotion::new(self.params.locomotion_config())?.with_patrol(self.patrol);
        if patrols {
            locomotion.require_patrol().map_err(|e| match e {
                LocomotionError::EmptyPatrolRoute => AgentError::EmptyPatrolRoute { archetype },
                other => AgentError::Locomotion(other),
            })?;
        }
        let engagement = Engagement::new(self.params.engagement_config()?)?;
        let sensor = Sensor::new(self.params.sensor_config())?;

        let facing = match self.facing.flatten() {
            f if f == Vec3::ZERO => Vec3::FORWARD,
            f => f,
        };
        let body = AgentBody {
            id,
            position: self.position,
            facing,
            home: self.position,
            state: BehaviorState::Idle,
            previous_state: BehaviorState::Idle,
            resume_state: BehaviorState::Alert,
            health: self.params.max_health,
            stamina: self.params.max_stamina,
            gait: Gait::Walk,
            alarm_cooldown: 0.0,
            order: None,
            sensor,
            locomotion,
            engagement,
            params: self.params,
        };
        tracing::debug!(agent = %id, %archetype, "agent built");
        Ok(Agent::from_parts(body, tree, AgentRng::new(self.seed, id)))
    }
}
