use serde::{Deserialize, Serialize};

use super::consumables::Consumable;

/// Counters of what the agent ate during an episode.
///
/// Score itself lives on the [`Agent`](crate::Agent); these counters are the
/// auxiliary attributes reported alongside fitness.
///
/// # Example
///
/// ```
/// use mazechase_engine::{Consumable, WorldStats};
///
/// let mut stats = WorldStats::new();
/// stats.record_consumable(Consumable::Dot);
/// stats.record_consumable(Consumable::PowerDot);
/// stats.record_ghosts(2);
///
/// assert_eq!(stats.dots_eaten(), 2);
/// assert_eq!(stats.power_dots_eaten(), 1);
/// assert_eq!(stats.ghosts_eaten(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldStats {
    dots_eaten: u32,
    power_dots_eaten: u32,
    ghosts_eaten: u32,
    fruit_eaten: u32,
}

impl WorldStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dots_eaten: 0,
            power_dots_eaten: 0,
            ghosts_eaten: 0,
            fruit_eaten: 0,
        }
    }

    /// Dots eaten, power dots included.
    #[must_use]
    pub const fn dots_eaten(&self) -> u32 {
        self.dots_eaten
    }

    #[must_use]
    pub const fn power_dots_eaten(&self) -> u32 {
        self.power_dots_eaten
    }

    #[must_use]
    pub const fn ghosts_eaten(&self) -> u32 {
        self.ghosts_eaten
    }

    #[must_use]
    pub const fn fruit_eaten(&self) -> u32 {
        self.fruit_eaten
    }

    pub const fn record_consumable(&mut self, kind: Consumable) {
        self.dots_eaten += 1;
        if matches!(kind, Consumable::PowerDot) {
            self.power_dots_eaten += 1;
        }
    }

    pub const fn record_ghosts(&mut self, count: u32) {
        self.ghosts_eaten += count;
    }

    pub const fn record_fruit(&mut self) {
        self.fruit_eaten += 1;
    }
}
