//! Controller activations to movement direction.

use mazechase_engine::Direction;
use serde::{Deserialize, Serialize};

/// Number of controller outputs, one per candidate direction.
pub const ACTION_COUNT: usize = 4;

/// How output indices map to directions.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum ActionOrdering {
    /// `[forward, right, back, left]` relative to the agent's heading.
    #[default]
    Perspective,
    /// `[up, right, down, left]` regardless of heading.
    Compass,
}

/// Index of the largest value; the lowest index wins ties and NaN never wins.
///
/// Returns `None` for an empty slice or one containing only NaN.
#[must_use]
pub fn stable_argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, max)| value > max) {
            best = Some((index, value));
        }
    }
    best.map(|(index, _)| index)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ActionDecoder {
    ordering: ActionOrdering,
}

impl ActionDecoder {
    #[must_use]
    pub const fn new(ordering: ActionOrdering) -> Self {
        Self { ordering }
    }

    #[must_use]
    pub const fn ordering(&self) -> ActionOrdering {
        self.ordering
    }

    /// Picks the direction for the strongest activation.
    ///
    /// With no usable activation (all NaN) index 0 is chosen, which under the
    /// perspective ordering keeps the current heading.
    #[must_use]
    pub fn decode(&self, activations: &[f32], heading: Direction) -> Direction {
        let index = stable_argmax(activations).unwrap_or(0) % ACTION_COUNT;
        match self.ordering {
            ActionOrdering::Perspective => heading.perspective()[index],
            ActionOrdering::Compass => Direction::ALL[index],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_argmax() {
        assert_eq!(stable_argmax(&[0.1, 0.9, 0.3, 0.9]), Some(1));
        assert_eq!(stable_argmax(&[0.5, 0.5, 0.5, 0.5]), Some(0));
        assert_eq!(stable_argmax(&[f32::NAN, -1.0, f32::NAN, -2.0]), Some(1));
        assert_eq!(stable_argmax(&[f32::NAN; 4]), None);
        assert_eq!(stable_argmax(&[]), None);
        assert_eq!(stable_argmax(&[f32::NEG_INFINITY, f32::INFINITY]), Some(1));
    }

    #[test]
    fn test_perspective_decoding() {
        let decoder = ActionDecoder::new(ActionOrdering::Perspective);
        // index 1 is "right" of the heading
        assert_eq!(decoder.decode(&[0.0, 1.0, 0.0, 0.0], Direction::Right), Direction::Down);
        assert_eq!(decoder.decode(&[0.0, 0.0, 1.0, 0.0], Direction::Up), Direction::Down);
        assert_eq!(decoder.decode(&[0.0, 0.0, 0.0, 1.0], Direction::Left), Direction::Down);
        assert_eq!(decoder.decode(&[f32::NAN; 4], Direction::Left), Direction::Left);
    }

    #[test]
    fn test_decoder_agrees_with_perspective() {
        let decoder = ActionDecoder::new(ActionOrdering::Perspective);
        for heading in Direction::ALL {
            for (index, dir) in heading.perspective().into_iter().enumerate() {
                let mut activations = [0.0; ACTION_COUNT];
                activations[index] = 1.0;
                assert_eq!(decoder.decode(&activations, heading), dir);
            }
        }
    }

    #[test]
    fn test_compass_decoding() {
        let decoder = ActionDecoder::new(ActionOrdering::Compass);
        for heading in Direction::ALL {
            assert_eq!(decoder.decode(&[0.0, 0.0, 2.0, 1.0], heading), Direction::Down);
        }
    }

    #[test]
    fn test_ordering_from_str() {
        assert_eq!("compass".parse::<ActionOrdering>().unwrap(), ActionOrdering::Compass);
        assert_eq!(
            "Perspective".parse::<ActionOrdering>().unwrap(),
            ActionOrdering::Perspective
        );
    }
}
