//! CSV archetype table loader.
//!
//! # CSV format
//!
//! One row per archetype.  Every column except `archetype` is optional;
//! missing columns and empty cells keep the built-in value for that
//! archetype.
//!
//! ```csv
//! archetype,run_speed,max_health,morale,perception_radius
//! grunt,4.5,,40,
//! scout,,70,,25
//! ```
//!
//! Archetypes absent from the file keep their built-in parameters.  A row
//! that names an unknown archetype, fails to parse, or produces an invalid
//! parameter set is rejected with its line number.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use npc_core::Archetype;

use crate::{AgentError, AgentResult, ArchetypeParams};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
struct ArchetypeRecord {
    archetype:              String,
    walk_speed:             Option<f32>,
    run_speed:              Option<f32>,
    max_health:             Option<f32>,
    max_stamina:            Option<f32>,
    stamina_drain_per_sec:  Option<f32>,
    stamina_regen_per_sec:  Option<f32>,
    perception_radius:      Option<f32>,
    fov_degrees:            Option<f32>,
    hearing_radius:         Option<f32>,
    aggression:             Option<f32>,
    intelligence:           Option<f32>,
    morale:                 Option<f32>,
    attack_frequency:       Option<f32>,
    attack_range:           Option<f32>,
    attack_damage:          Option<f32>,
    flee_health_fraction:   Option<f32>,
    behavior_interval_secs: Option<f32>,
    alarm_cooldown_secs:    Option<f32>,
}

impl ArchetypeRecord {
    fn into_params(self, archetype: Archetype) -> ArchetypeParams {
        let mut p = ArchetypeParams::for_archetype(archetype);
        let overrides = [
            (self.walk_speed,             &mut p.walk_speed),
            (self.run_speed,              &mut p.run_speed),
            (self.max_health,             &mut p.max_health),
            (self.max_stamina,            &mut p.max_stamina),
            (self.stamina_drain_per_sec,  &mut p.stamina_drain_per_sec),
            (self.stamina_regen_per_sec,  &mut p.stamina_regen_per_sec),
            (self.perception_radius,      &mut p.perception_radius),
            (self.fov_degrees,            &mut p.fov_degrees),
            (self.hearing_radius,         &mut p.hearing_radius),
            (self.aggression,             &mut p.aggression),
            (self.intelligence,           &mut p.intelligence),
            (self.morale,                 &mut p.morale),
            (self.attack_frequency,       &mut p.attack_frequency),
            (self.attack_range,           &mut p.attack_range),
            (self.attack_damage,          &mut p.attack_damage),
            (self.flee_health_fraction,   &mut p.flee_health_fraction),
            (self.behavior_interval_secs, &mut p.behavior_interval_secs),
            (self.alarm_cooldown_secs,    &mut p.alarm_cooldown_secs),
        ];
        for (value, field) in overrides {
            if let Some(v) = value {
                *field = v;
            }
        }
        p
    }
}

// ── ArchetypeTable ────────────────────────────────────────────────────────────

/// Parameter sets keyed by archetype, falling back to built-ins.
#[derive(Clone, Debug, Default)]
pub struct ArchetypeTable {
    overrides: BTreeMap<Archetype, ArchetypeParams>,
}

impl ArchetypeTable {
    /// A table holding only the built-in parameters.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Parameters for `archetype`: the loaded row if any, else built-in.
    pub fn get(&self, archetype: Archetype) -> ArchetypeParams {
        self.overrides
            .get(&archetype)
            .cloned()
            .unwrap_or_else(|| ArchetypeParams::for_archetype(archetype))
    }

    /// Replace the parameters for one archetype after validating them.
    pub fn insert(&mut self, params: ArchetypeParams) -> AgentResult<()> {
        params.validate()?;
        self.overrides.insert(params.archetype, params);
        Ok(())
    }

    /// Archetypes with loaded (non built-in) parameters.
    pub fn overridden(&self) -> impl Iterator<Item = Archetype> + '_ {
        self.overrides.keys().copied()
    }

    /// Load a table from a CSV file.
    pub fn from_csv(path: &Path) -> AgentResult<Self> {
        let file = std::fs::File::open(path).map_err(AgentError::Io)?;
        Self::from_reader(file)
    }

    /// Like [`from_csv`](Self::from_csv) but accepts any `Read` source.
    pub fn from_reader<R: Read>(reader: R) -> AgentResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut table = Self::default();

        for (i, result) in csv_reader.deserialize::<ArchetypeRecord>().enumerate() {
            // Header is line 1.
            let line = i + 2;
            let row = result.map_err(|e| AgentError::Parse(format!("line {line}: {e}")))?;
            let archetype: Archetype = row
                .archetype
                .parse()
                .map_err(|e| AgentError::Parse(format!("line {line}: {e}")))?;
            if table.overrides.contains_key(&archetype) {
                return Err(AgentError::Parse(format!("line {line}: duplicate row for {archetype}")));
            }
            table
                .insert(row.into_params(archetype))
                .map_err(|e| AgentError::Parse(format!("line {line}: {e}")))?;
        }

        tracing::debug!(rows = table.overrides.len(), "archetype table loaded");
        Ok(table)
    }
}
