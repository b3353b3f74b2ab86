/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Number of faces on each speed die. A combatant rolls `speed` of these
    /// every round and the sum decides its place in the turn order.
    pub dice_sides: u32,

    /// Upper bound on the size of a single roster at battle start.
    pub max_roster_size: usize,

    /// Optional cap on the number of rounds. When the next round would exceed
    /// it the battle ends with [`crate::EndReason::RoundLimit`].
    pub max_rounds: Option<u32>,

    /// How many side-sized runs of consecutive skipped turns trigger the
    /// "no actions available" notice for that side.
    pub stall_threshold: u32,
}

impl BattleConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DICE_SIDES: u32 = 6;
    pub const DEFAULT_MAX_ROSTER_SIZE: usize = 8;
    pub const DEFAULT_STALL_THRESHOLD: u32 = 1;

    // ===== compile-time constants =====
    /// Largest party the player can field. Templates beyond this are rejected
    /// by party-building tools, not by the battle itself.
    pub const MAX_PARTY_SIZE: usize = 4;

    pub fn new() -> Self {
        Self {
            dice_sides: Self::DEFAULT_DICE_SIDES,
            max_roster_size: Self::DEFAULT_MAX_ROSTER_SIZE,
            max_rounds: None,
            stall_threshold: Self::DEFAULT_STALL_THRESHOLD,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    pub fn with_dice_sides(mut self, dice_sides: u32) -> Self {
        self.dice_sides = dice_sides;
        self
    }

    pub fn with_max_roster_size(mut self, max_roster_size: usize) -> Self {
        self.max_roster_size = max_roster_size;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
