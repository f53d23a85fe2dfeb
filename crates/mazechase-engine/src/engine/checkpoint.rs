use serde::{Deserialize, Serialize};

use super::ghost::GhostKind;

/// Game event triggered when the remaining-dot count reaches a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CheckpointEvent {
    #[display("release {ghost}")]
    ReleaseGhost { ghost: GhostKind },
    #[display("escalate to level {level}")]
    Escalate { level: u8 },
    #[display("spawn fruit")]
    SpawnFruit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    remaining: u32,
    event: CheckpointEvent,
    fired: bool,
}

impl Checkpoint {
    #[must_use]
    pub const fn new(remaining: u32, event: CheckpointEvent) -> Self {
        Self {
            remaining,
            event,
            fired: false,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn event(&self) -> CheckpointEvent {
        self.event
    }

    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.fired
    }
}

/// Thresholds keyed by the number of dots still in the maze.
///
/// A checkpoint fires when the remaining count equals its threshold exactly, and at
/// most once per episode. The table is only consulted on frames where the count
/// changed.
#[derive(Debug, Clone)]
pub struct Checkpoints {
    items: Vec<Checkpoint>,
    last_remaining: Option<u32>,
}

impl Checkpoints {
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = Checkpoint>) -> Self {
        Self {
            items: items.into_iter().collect(),
            last_remaining: None,
        }
    }

    /// The classic table for a maze starting with `initial` dots.
    ///
    /// Ghost releases and fruit spawns are keyed by dots eaten (30 and 60 for
    /// Inky and Clyde, 70 and 170 for the fruit), so the table shifts when power
    /// dots are disabled. Aggression escalation stays at 20 and 10 remaining.
    /// Releases and escalation need dots and ghosts; fruit spawns need dots and
    /// fruit.
    #[must_use]
    pub fn standard(initial: u32, dots: bool, ghosts: bool, fruit: bool) -> Self {
        let after_eating = |eaten: u32| initial.checked_sub(eaten).filter(|left| *left > 0);
        let mut items = vec![];
        if dots && ghosts {
            let releases = [(30, GhostKind::Inky), (60, GhostKind::Clyde)];
            items.extend(releases.into_iter().filter_map(|(eaten, ghost)| {
                after_eating(eaten)
                    .map(|left| Checkpoint::new(left, CheckpointEvent::ReleaseGhost { ghost }))
            }));
            items.extend([
                Checkpoint::new(20, CheckpointEvent::Escalate { level: 1 }),
                Checkpoint::new(10, CheckpointEvent::Escalate { level: 2 }),
            ]);
        }
        if dots && fruit {
            items.extend(
                [70, 170]
                    .into_iter()
                    .filter_map(after_eating)
                    .map(|left| Checkpoint::new(left, CheckpointEvent::SpawnFruit)),
            );
        }
        Self::new(items)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> + '_ {
        self.items.iter()
    }

    #[must_use]
    pub fn fired_count(&self) -> usize {
        self.items.iter().filter(|item| item.fired).count()
    }

    /// Fires every unfired checkpoint whose threshold equals `remaining`.
    pub fn poll(&mut self, remaining: u32) -> Vec<CheckpointEvent> {
        if self.last_remaining.replace(remaining) == Some(remaining) {
            return vec![];
        }
        self.items
            .iter_mut()
            .filter(|item| !item.fired && item.remaining == remaining)
            .map(|item| {
                item.fired = true;
                item.event
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        assert_eq!(Checkpoints::standard(244, true, true, true).iter().count(), 6);
        assert_eq!(Checkpoints::standard(244, true, true, false).iter().count(), 4);
        assert_eq!(Checkpoints::standard(244, true, false, true).iter().count(), 2);
        assert_eq!(Checkpoints::standard(0, false, true, true).iter().count(), 0);

        let thresholds = |initial| {
            Checkpoints::standard(initial, true, true, true)
                .iter()
                .map(|c| (c.remaining(), c.event()))
                .collect::<Vec<_>>()
        };
        assert_eq!(
            thresholds(244),
            vec![
                (214, CheckpointEvent::ReleaseGhost { ghost: GhostKind::Inky }),
                (184, CheckpointEvent::ReleaseGhost { ghost: GhostKind::Clyde }),
                (20, CheckpointEvent::Escalate { level: 1 }),
                (10, CheckpointEvent::Escalate { level: 2 }),
                (174, CheckpointEvent::SpawnFruit),
                (74, CheckpointEvent::SpawnFruit),
            ]
        );
    }

    #[test]
    fn test_thresholds_follow_dots_eaten() {
        // without power dots the maze starts with 240
        let releases = Checkpoints::standard(240, true, true, false)
            .iter()
            .filter(|c| matches!(c.event(), CheckpointEvent::ReleaseGhost { .. }))
            .map(Checkpoint::remaining)
            .collect::<Vec<_>>();
        assert_eq!(releases, vec![210, 180]);

        // thresholds that would need more dots than exist are dropped
        assert_eq!(Checkpoints::standard(50, true, false, true).iter().count(), 0);
    }

    #[test]
    fn test_fires_on_exact_equality_once() {
        let mut checkpoints = Checkpoints::standard(244, true, true, true);
        assert!(checkpoints.poll(215).is_empty());
        assert_eq!(
            checkpoints.poll(214),
            vec![CheckpointEvent::ReleaseGhost { ghost: GhostKind::Inky }]
        );
        // unchanged count is not re-evaluated
        assert!(checkpoints.poll(214).is_empty());
        // skipping past a threshold never fires it
        assert!(checkpoints.poll(183).is_empty());
        assert_eq!(checkpoints.fired_count(), 1);
    }

    #[test]
    fn test_never_fires_twice() {
        let mut checkpoints = Checkpoints::new([Checkpoint::new(5, CheckpointEvent::SpawnFruit)]);
        assert_eq!(checkpoints.poll(5), vec![CheckpointEvent::SpawnFruit]);
        assert!(checkpoints.poll(6).is_empty());
        assert!(checkpoints.poll(5).is_empty());
        assert_eq!(checkpoints.fired_count(), 1);
    }

    #[test]
    fn test_event_serde() {
        let event = CheckpointEvent::ReleaseGhost {
            ghost: GhostKind::Clyde,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"kind":"release_ghost","ghost":"clyde"}"#);
    }
}
