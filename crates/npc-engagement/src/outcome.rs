use npc_core::Vec3;

/// The personality inputs to combat rolls, both on a 0–100 scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Temperament {
    pub morale: f32,
    pub intelligence: f32,
}

/// What a hit provoked.  The orchestrator turns this into state changes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DamageOutcome {
    /// Health after the hit.
    pub health: f32,
    pub lethal: bool,
    /// The flee roll succeeded.
    pub flee: bool,
    pub stunned: bool,
    /// Lateral displacement of a successful dodge.
    pub dodge: Option<Vec3>,
    pub knockback: Vec3,
}
