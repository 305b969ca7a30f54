//! Alert categories shared by agents (which raise them) and groups (which
//! route them).

/// What kind of stimulus an alert carries.  Each category maps to one
/// reaction on the receiving agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlertCategory {
    Sighting,
    Sound,
    AttackDetected,
    AllyDown,
    Alarm,
    BackupRequest,
}

impl AlertCategory {
    pub const ALL: [AlertCategory; 6] = [
        AlertCategory::Sighting,
        AlertCategory::Sound,
        AlertCategory::AttackDetected,
        AlertCategory::AllyDown,
        AlertCategory::Alarm,
        AlertCategory::BackupRequest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlertCategory::Sighting       => "sighting",
            AlertCategory::Sound          => "sound",
            AlertCategory::AttackDetected => "attack_detected",
            AlertCategory::AllyDown       => "ally_down",
            AlertCategory::Alarm          => "alarm",
            AlertCategory::BackupRequest  => "backup_request",
        }
    }
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
