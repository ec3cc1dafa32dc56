/// Domain limits enforced by the default rule set.
///
/// Every range is inclusive. Values are tuning bounds for content authors, not
/// engine hard limits: a record outside them still loads, it just fails
/// validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordLimits;

impl RecordLimits {
    // ===== combatants =====
    pub const MAX_HEALTH: (f64, f64) = (1.0, 100_000.0);
    pub const MOVE_SPEED: (f64, f64) = (0.0, 2_000.0);
    pub const ARMOR: (f64, f64) = (0.0, 1_000.0);
    pub const PICKUP_RADIUS: (f64, f64) = (0.0, 1_000.0);
    /// Maximum number of abilities a character can start with.
    pub const MAX_ABILITY_SLOTS: usize = 4;

    // ===== weapons =====
    pub const DAMAGE: (f64, f64) = (0.0, 10_000.0);
    pub const ATTACK_SPEED: (f64, f64) = (0.1, 10.0);
    pub const WEAPON_RANGE: (f64, f64) = (0.0, 5_000.0);
    pub const CRIT_CHANCE: (f64, f64) = (0.0, 1.0);
    pub const CRIT_MULTIPLIER: (f64, f64) = (1.0, 10.0);
    pub const PROJECTILES: (u32, u32) = (1, 32);

    // ===== abilities =====
    pub const COOLDOWN: (f64, f64) = (0.0, 600.0);
    pub const ABILITY_COST: (f64, f64) = (0.0, 10_000.0);
    pub const DURATION: (f64, f64) = (0.0, 600.0);
    pub const RADIUS: (f64, f64) = (0.0, 5_000.0);

    // ===== upgrades =====
    pub const MAX_LEVEL: (u32, u32) = (1, 100);

    // ===== monsters =====
    pub const EXPERIENCE_REWARD: (u32, u32) = (0, 1_000_000);
    pub const SPAWN_WEIGHT: (f64, f64) = (0.0, 1_000.0);
}
