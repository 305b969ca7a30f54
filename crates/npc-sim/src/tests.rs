//! Integration tests for npc-sim.
//!
//! Brutes are the default fixture: they guard their spawn point and need no
//! patrol route, so an agent that is left alone stays put in `Idle`.

#[cfg(test)]
mod helpers {
    use npc_agent::AgentBuilder;
    use npc_core::{Archetype, SimConfig, Vec3};
    use npc_spatial::NavField;

    use crate::{Sim, SimBuilder};

    pub fn config() -> SimConfig {
        SimConfig {
            tick_duration_secs: 0.05,
            total_ticks: 200,
            seed: 7,
            num_threads: Some(1),
            output_interval_ticks: 0,
            despawn_delay_secs: 0.5,
        }
    }

    pub fn brute(x: f32, z: f32) -> AgentBuilder {
        AgentBuilder::new(Archetype::Brute).position(Vec3::flat(x, z))
    }

    pub fn builder() -> SimBuilder<NavField> {
        SimBuilder::new(config(), NavField::open(60.0))
    }

    pub fn sim_with(agents: Vec<AgentBuilder>) -> Sim<NavField> {
        builder().agents(agents).auto_group(false).build().unwrap()
    }
}

#[cfg(test)]
mod builder_tests {
    use npc_agent::AgentBuilder;
    use npc_core::{AgentId, Archetype, SimConfig, Vec3};
    use npc_spatial::NavField;

    use super::helpers::{brute, builder, config};
    use crate::{SimBuilder, SimError};

    #[test]
    fn builds_with_agents_in_order() {
        let sim = builder().agent(brute(0.0, 0.0)).agent(brute(5.0, 0.0)).build().unwrap();
        assert_eq!(sim.agents.len(), 2);
        assert_eq!(sim.agent(AgentId(1)).unwrap().position(), Vec3::flat(5.0, 0.0));
        assert_eq!(sim.clock.current_tick.0, 0);
    }

    #[test]
    fn zero_tick_duration_is_rejected() {
        let cfg = SimConfig { tick_duration_secs: 0.0, ..config() };
        let result = SimBuilder::new(cfg, NavField::open(10.0)).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn zero_worker_threads_are_rejected() {
        let cfg = SimConfig { num_threads: Some(0), ..config() };
        let result = SimBuilder::new(cfg, NavField::open(10.0)).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn negative_despawn_delay_is_rejected() {
        let cfg = SimConfig { despawn_delay_secs: -1.0, ..config() };
        assert!(matches!(SimBuilder::new(cfg, NavField::open(10.0)).build(), Err(SimError::Config(_))));
    }

    #[test]
    fn authored_group_with_unknown_member_fails() {
        let result = builder()
            .agent(brute(0.0, 0.0))
            .group("alpha", vec![AgentId(0), AgentId(4)])
            .build();
        assert!(matches!(result, Err(SimError::UnknownAgent(AgentId(4)))));
    }

    #[test]
    fn invalid_agent_surfaces_as_agent_error() {
        // Grunts patrol; without points they cannot be built.
        let result = builder().agent(AgentBuilder::new(Archetype::Grunt)).build();
        assert!(matches!(result, Err(SimError::Agent(_))));
    }

    #[test]
    fn auto_grouping_clusters_neighbours() {
        let sim = builder()
            .agent(brute(0.0, 0.0))
            .agent(brute(3.0, 0.0))
            .agent(brute(50.0, 50.0))
            .build()
            .unwrap();
        let g0 = sim.groups.group_of(AgentId(0)).unwrap();
        assert_eq!(sim.groups.group_of(AgentId(1)), Some(g0));
        assert_ne!(sim.groups.group_of(AgentId(2)), Some(g0));
    }

    #[test]
    fn authored_groups_come_before_assignment() {
        let sim = builder()
            .agent(brute(0.0, 0.0))
            .agent(brute(1.0, 0.0))
            .agent(brute(2.0, 0.0))
            .group("pair", vec![AgentId(0), AgentId(2)])
            .build()
            .unwrap();
        let pair = sim.groups.group_of(AgentId(0)).unwrap();
        assert_eq!(sim.groups.get(pair).unwrap().name(), "pair");
        assert_eq!(sim.groups.group_of(AgentId(1)), Some(pair));
    }
}

#[cfg(test)]
mod group_reactions {
    use npc_core::{AgentId, AlertCategory, BehaviorState, Vec3};
    use npc_group::{AlertEvent, GroupConfig};

    use super::helpers::{brute, builder};
    use crate::view::ArenaView;

    #[test]
    fn sighting_moves_only_members_in_range() {
        let mut sim = builder()
            .agents([brute(10.0, 0.0), brute(0.0, 10.0), brute(25.0, 0.0)])
            .group("trio", vec![AgentId(0), AgentId(1), AgentId(2)])
            .group_config(GroupConfig { communication_range: 20.0, min_size: 2, ..GroupConfig::default() })
            .build()
            .unwrap();
        let g = sim.groups.group_of(AgentId(0)).unwrap();

        let event = AlertEvent::new(AlertCategory::Sighting, Vec3::ZERO, 100.0, 0.0);
        let reactions = sim.groups.broadcast_to(g, event, &ArenaView(&sim.agents), &sim.nav).unwrap();
        assert_eq!(sim.apply_reactions(reactions), 2);

        for id in [AgentId(0), AgentId(1)] {
            let agent = sim.agent(id).unwrap();
            assert_eq!(agent.state(), BehaviorState::Alert);
            assert_eq!(agent.body().locomotion().state().target, Some(Vec3::ZERO));
        }
        let third = sim.agent(AgentId(2)).unwrap();
        assert_eq!(third.state(), BehaviorState::Idle);
        assert_eq!(third.body().locomotion().state().target, None);
    }

    #[test]
    fn death_costs_morale_and_despawns_later() {
        let mut sim = builder()
            .agents([brute(0.0, 0.0), brute(2.0, 0.0), brute(4.0, 0.0)])
            .group_config(GroupConfig { morale_loss_per_casualty: 20.0, ..GroupConfig::default() })
            .build()
            .unwrap();
        let g = sim.groups.group_of(AgentId(2)).unwrap();
        assert_eq!(sim.groups.get(g).unwrap().len(), 3);

        let outcome = sim.damage_agent(AgentId(2), 10_000.0, Vec3::FORWARD).unwrap();
        assert!(outcome.lethal);

        let summary = sim.step(&mut crate::NoopObserver).clone();
        assert_eq!(summary.deaths, 1);
        assert_eq!(summary.living, 2);

        let group = sim.groups.get(g).unwrap();
        assert_eq!(group.len(), 2);
        assert!(group.morale() >= 80.0 && group.morale() < 81.0);
        assert_eq!(sim.groups.group_of(AgentId(2)), None);

        // Still in the arena while the despawn delay runs.
        sim.run_ticks(5, &mut crate::NoopObserver).unwrap();
        assert!(sim.agents.contains(AgentId(2)));
        sim.run_ticks(8, &mut crate::NoopObserver).unwrap();
        assert!(!sim.agents.contains(AgentId(2)));
        assert!(sim.despawns.is_empty());
    }

    #[test]
    fn retreat_and_flank_orders_reach_agents() {
        let mut sim = builder()
            .agents([brute(0.0, -10.0), brute(2.0, -10.0), brute(-2.0, -10.0)])
            .build()
            .unwrap();
        let g = sim.groups.group_of(AgentId(0)).unwrap();

        assert_eq!(sim.coordinate_attack(g, Vec3::ZERO).unwrap(), 3);
        for agent in sim.agents.iter() {
            assert_eq!(agent.state(), BehaviorState::Chase);
            let slot = agent.body().locomotion().state().target.unwrap();
            assert!((slot.distance_xz(Vec3::ZERO) - 4.0).abs() < 1e-3);
        }

        let fallback = Vec3::flat(0.0, -30.0);
        assert_eq!(sim.coordinate_retreat(g, fallback).unwrap(), 3);
        for agent in sim.agents.iter() {
            assert_eq!(agent.state(), BehaviorState::Flee);
            assert_eq!(agent.body().locomotion().state().target, Some(fallback));
        }
    }

    #[test]
    fn flank_slots_hold_until_reached() {
        let mut sim = builder()
            .agents([brute(0.0, -10.0), brute(2.0, -10.0), brute(-2.0, -10.0)])
            .build()
            .unwrap();
        let g = sim.groups.group_of(AgentId(0)).unwrap();
        sim.coordinate_attack(g, Vec3::ZERO).unwrap();

        sim.run_ticks(10, &mut crate::NoopObserver).unwrap();
        for agent in sim.agents.iter() {
            assert_eq!(agent.state(), BehaviorState::Chase);
            let slot = agent.body().locomotion().state().target.unwrap();
            assert!((slot.distance_xz(Vec3::ZERO) - 4.0).abs() < 1e-3, "{agent:?}");
            // The target itself is only remembered once the slot is reached.
            assert_eq!(agent.body().sensor().snapshot().last_known_position, None);
        }
    }

    #[test]
    fn retreat_outlasts_tree_passes() {
        let mut sim = builder()
            .agents([brute(0.0, -10.0), brute(2.0, -10.0), brute(-2.0, -10.0)])
            .build()
            .unwrap();
        let g = sim.groups.group_of(AgentId(0)).unwrap();
        let fallback = Vec3::flat(0.0, -30.0);
        sim.coordinate_retreat(g, fallback).unwrap();

        sim.run_ticks(20, &mut crate::NoopObserver).unwrap();
        assert_eq!(sim.last_summary().fleeing, 3);
        for agent in sim.agents.iter() {
            assert_eq!(agent.state(), BehaviorState::Flee);
            assert_eq!(agent.body().locomotion().state().target, Some(fallback));
        }
    }
}

#[cfg(test)]
mod world {
    use npc_agent::{AgentBuilder, AgentEvent};
    use npc_core::{AgentId, AlertCategory, Archetype, BehaviorState, TargetId, TargetLocator, Vec3};

    use super::helpers::{brute, builder, sim_with};
    use crate::{SummaryLog, TargetRegistry};

    #[test]
    fn sound_reaches_agents_in_global_range() {
        let mut sim = sim_with(vec![brute(5.0, 0.0), brute(-30.0, 0.0), brute(55.0, 0.0)]);
        assert_eq!(sim.emit_sound(Vec3::ZERO, 80.0), 2);

        let near = sim.agent(AgentId(0)).unwrap();
        assert!(near.body().sensor().snapshot().last_sound.is_some());
    }

    #[test]
    fn alarm_alerts_everyone_in_range() {
        let mut sim = sim_with(vec![brute(5.0, 0.0), brute(55.0, 0.0)]);
        let at = Vec3::flat(1.0, 1.0);
        assert_eq!(sim.raise_alarm(at, 100.0), 1);

        let near = sim.agent(AgentId(0)).unwrap();
        assert_eq!(near.state(), BehaviorState::Alert);
        assert_eq!(near.body().locomotion().state().target, Some(at));
        assert_eq!(sim.agent(AgentId(1)).unwrap().state(), BehaviorState::Idle);
    }

    #[test]
    fn alarm_outlasts_tree_passes() {
        let grunt = AgentBuilder::new(Archetype::Grunt)
            .position(Vec3::flat(10.0, 0.0))
            .patrol(vec![Vec3::flat(10.0, 0.0), Vec3::flat(14.0, 0.0)]);
        let mut sim = sim_with(vec![brute(5.0, 0.0), grunt]);
        let at = Vec3::flat(-10.0, -10.0);
        assert_eq!(sim.raise_alarm(at, 100.0), 2);

        sim.run_ticks(20, &mut crate::NoopObserver).unwrap();
        for agent in sim.agents.iter() {
            assert_eq!(agent.state(), BehaviorState::Alert, "{agent:?}");
            assert_eq!(agent.body().locomotion().state().target, Some(at));
        }
    }

    #[test]
    fn sentry_alarm_spreads_over_the_bus() {
        let sentry = AgentBuilder::new(Archetype::Sentry).position(Vec3::ZERO);
        let mut sim = builder()
            .agent(sentry)
            .agent(brute(-15.0, -5.0))
            .target(Vec3::flat(0.0, 10.0), 100.0)
            .auto_group(false)
            .build()
            .unwrap();

        let mut log = SummaryLog::default();
        sim.run_ticks(10, &mut log).unwrap();

        let alarms = log
            .events
            .iter()
            .filter(|(_, e)| {
                matches!(e, AgentEvent::Alert { agent: AgentId(0), category: AlertCategory::Alarm, .. })
            })
            .count();
        assert_eq!(alarms, 1);
        assert!(log.events.iter().any(|(_, e)| matches!(
            e,
            AgentEvent::StateChanged { agent: AgentId(1), to: BehaviorState::Alert, .. }
        )));
    }

    #[test]
    fn brute_hits_land_on_the_target() {
        let mut sim = builder()
            .agent(brute(0.0, 0.0))
            .target(Vec3::flat(0.0, 1.5), 100.0)
            .build()
            .unwrap();

        let mut log = SummaryLog::default();
        sim.run_ticks(60, &mut log).unwrap();

        let hits: usize = log.summaries.iter().map(|s| s.hits).sum();
        let dealt: f32 = log.summaries.iter().map(|s| s.damage_dealt).sum();
        assert!(hits >= 1);
        let target = sim.targets.target(TargetId(0)).unwrap();
        assert!((target.health() - (100.0 - dealt)).abs() < 1e-3);
        assert!(target.health() < 100.0);
    }

    #[test]
    fn locator_prefers_nearest_living_target() {
        let mut targets = TargetRegistry::new();
        let far = targets.insert(Vec3::flat(10.0, 0.0), 50.0);
        let near = targets.insert(Vec3::flat(2.0, 0.0), 50.0);
        assert_eq!(targets.locate(Vec3::ZERO).unwrap().id, near);

        assert!(targets.apply_damage(near, 80.0, Vec3::FORWARD));
        assert_eq!(targets.target(near).unwrap().health(), 0.0);
        assert_eq!(targets.locate(Vec3::ZERO).unwrap().id, far);
        assert!(!targets.get(near).unwrap().alive);

        targets.remove(far);
        assert!(targets.locate(Vec3::ZERO).is_none());
        assert!(!targets.apply_damage(far, 1.0, Vec3::FORWARD));
    }
}

#[cfg(test)]
mod lifecycle {
    use npc_core::{AgentId, Tick, Vec3};

    use super::helpers::{brute, builder, sim_with};
    use crate::{DespawnQueue, NoopObserver, SimObserver, SummaryLog};

    #[derive(Default)]
    struct Counter {
        ticks: usize,
        snapshots: usize,
        ended: Option<Tick>,
    }

    impl SimObserver for Counter {
        fn on_tick_end(&mut self, _tick: Tick, _summary: &crate::TickSummary) {
            self.ticks += 1;
        }

        fn on_snapshot(&mut self, _tick: Tick, agents: &npc_agent::AgentArena) {
            assert_eq!(agents.len(), 1);
            self.snapshots += 1;
        }

        fn on_sim_end(&mut self, final_tick: Tick) {
            self.ended = Some(final_tick);
        }
    }

    #[test]
    fn run_stops_at_end_tick_with_snapshots_on_interval() {
        let mut cfg = super::helpers::config();
        cfg.total_ticks = 30;
        cfg.output_interval_ticks = 10;
        let mut sim = crate::SimBuilder::new(cfg, npc_spatial::NavField::open(20.0))
            .agent(brute(0.0, 0.0))
            .build()
            .unwrap();

        let mut counter = Counter::default();
        sim.run(&mut counter).unwrap();
        assert_eq!(counter.ticks, 30);
        assert_eq!(counter.snapshots, 3);
        assert_eq!(counter.ended, Some(Tick(30)));
    }

    #[test]
    fn ids_are_not_reused_after_despawn() {
        let mut sim = sim_with(vec![brute(0.0, 0.0)]);
        sim.damage_agent(AgentId(0), 10_000.0, Vec3::FORWARD).unwrap();
        sim.run_ticks(20, &mut NoopObserver).unwrap();
        assert!(sim.agents.is_empty());

        let id = sim.spawn(brute(1.0, 1.0)).unwrap();
        assert_eq!(id, AgentId(1));
        assert!(sim.agent(AgentId(0)).is_none());
    }

    #[test]
    fn same_seed_same_run() {
        let run = || {
            let mut sim = builder()
                .agents([brute(0.0, 0.0), brute(4.0, 3.0), brute(-6.0, 2.0)])
                .target(Vec3::flat(3.0, 6.0), 500.0)
                .build()
                .unwrap();
            let mut log = SummaryLog::default();
            sim.run_ticks(120, &mut log).unwrap();
            (sim.snapshots(), log.summaries)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn despawn_queue_drains_everything_due() {
        let mut q = DespawnQueue::new();
        q.push(Tick(5), AgentId(3));
        q.push(Tick(2), AgentId(1));
        q.push(Tick(9), AgentId(0));
        assert_eq!(q.len(), 3);
        assert_eq!(q.next_tick(), Some(Tick(2)));

        assert!(q.drain_due(Tick(1)).is_empty());
        assert_eq!(q.drain_due(Tick(5)), vec![AgentId(1), AgentId(3)]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.drain_due(Tick(100)), vec![AgentId(0)]);
        assert!(q.is_empty());
    }
}

#[cfg(all(test, feature = "parallel"))]
mod parallel {
    use npc_core::{SimConfig, Vec3};
    use npc_spatial::NavField;

    use super::helpers::{brute, config};
    use crate::{SimBuilder, SummaryLog};

    fn run_with(num_threads: Option<usize>) -> (Vec<npc_agent::AgentSnapshot>, Vec<crate::TickSummary>) {
        let cfg = SimConfig { num_threads, ..config() };
        let mut sim = SimBuilder::new(cfg, NavField::open(60.0))
            .agents([brute(0.0, 0.0), brute(4.0, 3.0), brute(-6.0, 2.0), brute(8.0, -8.0)])
            .target(Vec3::flat(3.0, 6.0), 500.0)
            .build()
            .unwrap();
        let mut log = SummaryLog::default();
        sim.run_ticks(80, &mut log).unwrap();
        (sim.snapshots(), log.summaries)
    }

    #[test]
    fn worker_pool_matches_single_thread() {
        let (snaps, summaries) = run_with(Some(2));
        assert_eq!(summaries.len(), 80);
        assert_eq!((snaps, summaries), run_with(Some(1)));
    }
}
