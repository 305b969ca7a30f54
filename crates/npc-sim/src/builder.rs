//! Fluent builder for constructing a [`Sim`].

use npc_agent::{AgentArena, AgentBuilder};
use npc_core::{AgentId, SimConfig, Vec3};
use npc_group::{AlertBus, AlertBusConfig, GroupConfig, GroupRegistry};
use npc_spatial::NavQuery;

use crate::view::ArenaView;
use crate::{DespawnQueue, Sim, SimError, SimResult, TargetRegistry, TickSummary};

/// Fluent builder for [`Sim<N>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick duration, total ticks, seed, despawn delay
/// - `N: NavQuery`: the navigation provider (e.g. [`npc_spatial::NavField`])
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                   |
/// |---------------------|-------------------------------------------|
/// | `.group_config(c)`  | `GroupConfig::default()`                  |
/// | `.bus_config(c)`    | `AlertBusConfig::default()`               |
/// | `.agent(b)`         | no agents                                 |
/// | `.group(name, ids)` | no authored groups                        |
/// | `.target(p, hp)`    | no targets                                |
/// | `.auto_group(b)`    | `true`: proximity + archetype assignment  |
///
/// Agents get ids in the order they were added, starting at 0; authored
/// groups refer to those ids and are created before automatic assignment.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimConfig::default(), NavField::open(50.0))
///     .agent(AgentBuilder::new(Archetype::Brute).position(Vec3::flat(3.0, 0.0)))
///     .target(Vec3::flat(20.0, 0.0), 100.0)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<N: NavQuery> {
    config: SimConfig,
    nav: N,
    group_config: GroupConfig,
    bus_config: AlertBusConfig,
    agents: Vec<AgentBuilder>,
    groups: Vec<(String, Vec<AgentId>)>,
    targets: Vec<(Vec3, f32)>,
    auto_group: bool,
}

impl<N: NavQuery> SimBuilder<N> {
    pub fn new(config: SimConfig, nav: N) -> Self {
        Self {
            config,
            nav,
            group_config: GroupConfig::default(),
            bus_config: AlertBusConfig::default(),
            agents: Vec::new(),
            groups: Vec::new(),
            targets: Vec::new(),
            auto_group: true,
        }
    }

    pub fn group_config(mut self, config: GroupConfig) -> Self {
        self.group_config = config;
        self
    }

    pub fn bus_config(mut self, config: AlertBusConfig) -> Self {
        self.bus_config = config;
        self
    }

    pub fn agent(mut self, builder: AgentBuilder) -> Self {
        self.agents.push(builder);
        self
    }

    pub fn agents<I: IntoIterator<Item = AgentBuilder>>(mut self, builders: I) -> Self {
        self.agents.extend(builders);
        self
    }

    pub fn group(mut self, name: impl Into<String>, members: Vec<AgentId>) -> Self {
        self.groups.push((name.into(), members));
        self
    }

    pub fn target(mut self, position: Vec3, health: f32) -> Self {
        self.targets.push((position, health));
        self
    }

    pub fn auto_group(mut self, enabled: bool) -> Self {
        self.auto_group = enabled;
        self
    }

    /// Validate inputs, spawn the population, form groups and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<N>> {
        let tick = self.config.tick_duration_secs;
        if !(tick.is_finite() && tick > 0.0) {
            return Err(SimError::Config(format!("tick_duration_secs must be > 0, got {tick}")));
        }
        let delay = self.config.despawn_delay_secs;
        if !(delay.is_finite() && delay >= 0.0) {
            return Err(SimError::Config(format!("despawn_delay_secs must be >= 0, got {delay}")));
        }
        if !(self.bus_config.global_range >= 0.0) {
            return Err(SimError::Config("alert bus global_range must be >= 0".into()));
        }
        if self.config.num_threads == Some(0) {
            return Err(SimError::Config("num_threads must be at least 1".into()));
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::Config(format!("agent thread pool: {e}")))?,
            ),
            None => None,
        };

        let mut groups = GroupRegistry::new(self.group_config)?;

        let mut agents = AgentArena::new();
        for builder in self.agents {
            agents.spawn(builder.seed(self.config.seed))?;
        }

        for (name, members) in self.groups {
            if let Some(&missing) = members.iter().find(|&&id| !agents.contains(id)) {
                return Err(SimError::UnknownAgent(missing));
            }
            groups.create_group(name, &members, &ArenaView(&agents))?;
        }
        if self.auto_group {
            groups.assign_all(agents.ids().collect::<Vec<_>>(), &ArenaView(&agents))?;
        }

        let mut targets = TargetRegistry::new();
        for (position, health) in self.targets {
            targets.insert(position, health);
        }

        tracing::debug!(agents = agents.len(), groups = groups.len(), targets = targets.len(), "simulation built");

        Ok(Sim {
            clock: self.config.make_clock(),
            config: self.config,
            agents,
            groups,
            bus: AlertBus::new(self.bus_config),
            targets,
            despawns: DespawnQueue::new(),
            nav: self.nav,
            auto_group: self.auto_group,
            last_summary: TickSummary::default(),
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
