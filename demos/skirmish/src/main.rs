//! skirmish — a scripted intruder slips into a guarded courtyard.
//!
//! A mixed patrol (grunts, a scout, a brute and a sentry) guards a walled
//! courtyard.  An intruder enters through the south edge, walks through the
//! gate in the inner wall and heads for the barracks.  Twenty seconds in,
//! the courtyard alarm goes off and every group is ordered to flank the
//! intruder's position.
//!
//! Output lands in `output/skirmish/`: per-tick summaries and periodic agent
//! snapshots as CSV, plus the final agent snapshots as JSON.
//! Set `RUST_LOG=debug` for tree activations and group chatter.

mod courtyard;

use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use npc_agent::{AgentArena, AgentBuilder, AgentEvent, ArchetypeTable};
use npc_core::{Archetype, GroupId, SimConfig, Tick, Vec3};
use npc_output::{CsvWriter, OutputWriter, SimOutputObserver};
use npc_sim::{SimBuilder, SimObserver, TickSummary};

use courtyard::build_courtyard;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                  u64 = 42;
const TICK_DURATION_SECS:    f32 = 0.05; // 20 Hz
const TOTAL_TICKS:           u64 = 1_200;
const OUTPUT_INTERVAL_TICKS: u64 = 20; // one snapshot per simulated second
const ALARM_TICK:            u64 = 400;
const ALARM_INTENSITY:       f32 = 80.0;

const INTRUDER_HEALTH: f32 = 400.0;
const INTRUDER_SPEED:  f32 = 1.4;
const INTRUDER_ROUTE: [Vec3; 5] = [
    Vec3::flat(0.0, -24.0),
    Vec3::flat(0.0, -2.0),
    Vec3::flat(5.0, 4.0),
    Vec3::flat(4.0, 14.0),
    Vec3::flat(-4.0, 17.0),
];

// Local tuning on top of the built-in archetypes: slightly faster grunts and
// a sharper-eyed scout.
const ARCHETYPE_CSV: &str = "\
archetype,run_speed,perception_radius,morale\n\
grunt,5.0,,55\n\
scout,,24,\n\
";

// ── Intruder script ───────────────────────────────────────────────────────────

/// Position and velocity `t` seconds after the intruder sets off.  It stops
/// at the end of the route.
fn intruder_motion(t: f32) -> (Vec3, Vec3) {
    let mut remaining = t.max(0.0) * INTRUDER_SPEED;
    for leg in INTRUDER_ROUTE.windows(2) {
        let (from, to) = (leg[0], leg[1]);
        let length = from.distance_xz(to);
        if remaining <= length {
            let dir = (to - from).normalize_or_zero();
            return (from + dir * remaining, dir * INTRUDER_SPEED);
        }
        remaining -= length;
    }
    (INTRUDER_ROUTE[INTRUDER_ROUTE.len() - 1], Vec3::ZERO)
}

// ── Patrol ────────────────────────────────────────────────────────────────────

fn patrol(table: &ArchetypeTable) -> Vec<AgentBuilder> {
    let agent = |archetype: Archetype, x: f32, z: f32| {
        AgentBuilder::with_params(table.get(archetype)).position(Vec3::flat(x, z))
    };
    vec![
        agent(Archetype::Sentry, 0.0, 13.0).facing(Vec3::flat(0.0, -1.0)),
        agent(Archetype::Grunt, -18.0, 12.0)
            .patrol(vec![Vec3::flat(-18.0, 12.0), Vec3::flat(18.0, 12.0)]),
        agent(Archetype::Grunt, 10.0, 4.0)
            .patrol(vec![Vec3::flat(10.0, 4.0), Vec3::flat(20.0, 16.0)]),
        agent(Archetype::Brute, -10.0, 16.0),
        agent(Archetype::Scout, -20.0, -12.0).patrol(vec![
            Vec3::flat(-20.0, -12.0),
            Vec3::flat(-6.0, -12.0),
            Vec3::flat(-6.0, -20.0),
        ]),
        agent(Archetype::Grunt, 15.0, -15.0)
            .patrol(vec![Vec3::flat(15.0, -15.0), Vec3::flat(15.0, -5.0)]),
    ]
}

// ── Observer wrapper to count rows and events ────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    snapshot_rows: usize,
    summary_rows:  usize,
    alerts:        usize,
    hits:          usize,
    deaths:        usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, snapshot_rows: 0, summary_rows: 0, alerts: 0, hits: 0, deaths: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_agent_event(&mut self, tick: Tick, event: &AgentEvent) {
        match event {
            AgentEvent::Alert { .. } => self.alerts += 1,
            AgentEvent::Hit { .. } => self.hits += 1,
            AgentEvent::Died { .. } => self.deaths += 1,
            _ => {}
        }
        self.inner.on_agent_event(tick, event);
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.summary_rows += 1;
        self.inner.on_tick_end(tick, summary);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &AgentArena) {
        self.snapshot_rows += agents.len();
        self.inner.on_snapshot(tick, agents);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    println!("=== skirmish — NPC decision core ===");

    // 1. Courtyard and archetype tuning.
    let nav = build_courtyard()?;
    let table = ArchetypeTable::from_reader(Cursor::new(ARCHETYPE_CSV))?;
    let tuned: Vec<String> = table.overridden().map(|a| a.to_string()).collect();
    println!("Courtyard: {} obstacles | tuned archetypes: {}", nav.obstacle_count(), tuned.join(", "));

    // 2. Sim config.
    let config = SimConfig {
        tick_duration_secs:    TICK_DURATION_SECS,
        total_ticks:           TOTAL_TICKS,
        seed:                  SEED,
        num_threads:           None,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
        despawn_delay_secs:    3.0,
    };

    // 3. Build sim: agents are grouped by proximity and archetype.
    let mut sim = SimBuilder::new(config.clone(), nav).agents(patrol(&table)).build()?;
    let (start, _) = intruder_motion(0.0);
    let intruder = sim.add_target(start, INTRUDER_HEALTH);
    println!("Agents: {} | groups: {} | intruder: {intruder}", sim.agents.len(), sim.groups.len());
    for group in sim.groups.iter() {
        println!("  group {:<12} members {:?}", group.name(), group.members());
    }
    println!();

    // 4. Set up output.
    let out_dir = Path::new("output/skirmish");
    let writer = CsvWriter::new(out_dir)?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer, &config));

    // 5. Run, scripting the intruder and the alarm between ticks.
    let t0 = Instant::now();
    while sim.clock.current_tick < config.end_tick() {
        let (position, velocity) = intruder_motion(sim.now_secs() as f32);
        sim.targets.set_motion(intruder, position, velocity);

        if sim.clock.current_tick == Tick(ALARM_TICK) {
            let reached = sim.raise_alarm(position, ALARM_INTENSITY);
            let groups: Vec<GroupId> = sim.groups.iter().map(|g| g.id()).collect();
            let mut flankers = 0;
            for group in groups {
                flankers += sim.coordinate_attack(group, position)?;
            }
            tracing::info!(reached, flankers, at = %position, "courtyard alarm");
        }

        sim.step(&mut obs);
    }
    obs.on_sim_end(sim.clock.current_tick);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Final agent state as JSON.
    let json = BufWriter::new(File::create(out_dir.join("final_agents.json"))?);
    serde_json::to_writer_pretty(json, &sim.snapshots())?;

    // 7. Summary.
    println!("Simulation complete in {:.3} s ({} ticks)", elapsed.as_secs_f64(), sim.clock.current_tick);
    println!("  agent_snapshots.csv : {} rows", obs.snapshot_rows);
    println!("  tick_summaries.csv  : {} rows", obs.summary_rows);
    println!("  alerts {} | hits {} | deaths {}", obs.alerts, obs.hits, obs.deaths);
    match sim.targets.target(intruder) {
        Some(t) => println!("  intruder health {:.1}/{:.1}", t.health(), t.max_health()),
        None => println!("  intruder removed"),
    }
    println!();

    println!("{:<6} {:<8} {:<12} {:>8} {:>8}  Position", "Agent", "Kind", "State", "Health", "Stamina");
    println!("{}", "-".repeat(64));
    for agent in sim.agents.iter() {
        println!(
            "{:<6} {:<8} {:<12} {:>8.1} {:>8.1}  {}",
            agent.id().0,
            agent.archetype().as_str(),
            agent.state().as_str(),
            agent.health(),
            agent.stamina(),
            agent.position(),
        );
    }

    Ok(())
}
