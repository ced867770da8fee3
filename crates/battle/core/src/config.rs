/// Battle tuning constants and per-session parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Seconds of round time until the custom gauge fills.
    pub custom_duration: f64,
    /// Seconds the combo-resolution phase takes.
    pub combo_duration: f64,
    /// Seconds a time-freeze interruption lasts.
    pub freeze_duration: f64,
    /// Whether the local player may pause combat. PVP disables this.
    pub pausing_enabled: bool,
}

impl BattleConfig {
    // ===== compile-time capacities =====
    /// Maximum nested sub-combat phases a combat phase can register.
    pub const MAX_SUBCOMBAT: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CUSTOM_DURATION: f64 = 10.0;
    pub const DEFAULT_COMBO_DURATION: f64 = 1.0;
    pub const DEFAULT_FREEZE_DURATION: f64 = 2.0;

    pub fn new() -> Self {
        Self {
            custom_duration: Self::DEFAULT_CUSTOM_DURATION,
            combo_duration: Self::DEFAULT_COMBO_DURATION,
            freeze_duration: Self::DEFAULT_FREEZE_DURATION,
            pausing_enabled: true,
        }
    }

    /// PVP preset: pausing off, everything else at defaults.
    pub fn pvp() -> Self {
        Self {
            pausing_enabled: false,
            ..Self::new()
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
