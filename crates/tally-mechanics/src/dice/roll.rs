//! Dice roll results and success counting.

use serde::{Deserialize, Serialize};

use super::DieSize;
use crate::config::ResolutionConfig;

/// The result of rolling a single die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieFace {
    /// The type of die that was rolled.
    pub die: DieSize,
    /// The value rolled (1 to die.sides()).
    pub value: u32,
}

/// The counted result of one pool roll.
///
/// Botches never subtract from successes; they only matter for fumble
/// detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Individual faces, in roll order.
    pub faces: Vec<DieFace>,
    /// Faces at or above the success threshold.
    pub net_successes: u32,
    /// Faces showing the botch value.
    pub botches: u32,
}

impl RollResult {
    /// Count successes and botches over a set of faces.
    pub fn from_faces(faces: Vec<DieFace>, config: &ResolutionConfig) -> Self {
        let net_successes = faces
            .iter()
            .filter(|f| config.is_success(f.die, f.value))
            .count() as u32;
        let botches = faces.iter().filter(|f| config.is_botch(f.value)).count() as u32;
        Self {
            faces,
            net_successes,
            botches,
        }
    }

    /// A result with the given counts and no recorded faces.
    ///
    /// Useful when successes come from somewhere other than a physical roll.
    pub fn from_counts(net_successes: u32, botches: u32) -> Self {
        Self {
            faces: Vec::new(),
            net_successes,
            botches,
        }
    }

    /// Fold another participant's roll into this one, summing counts.
    pub fn absorb(&mut self, other: RollResult) {
        self.net_successes += other.net_successes;
        self.botches += other.botches;
        self.faces.extend(other.faces);
    }

    /// Returns true if the roll is a fumble: no successes and at least one botch.
    pub fn is_fumble(&self) -> bool {
        self.net_successes == 0 && self.botches >= 1
    }

    /// Number of dice in the result.
    pub fn count(&self) -> usize {
        self.faces.len()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.faces.iter().map(|d| d.value.to_string()).collect();
        write!(
            f,
            "[{}] = {} successes, {} botches",
            values.join(", "),
            self.net_successes,
            self.botches
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d10_faces(values: &[u32]) -> Vec<DieFace> {
        values
            .iter()
            .map(|&value| DieFace {
                die: DieSize::D10,
                value,
            })
            .collect()
    }

    #[test]
    fn counts_successes_and_botches() {
        let cfg = ResolutionConfig::default();
        let r = RollResult::from_faces(d10_faces(&[1, 3, 7, 10, 1]), &cfg);
        assert_eq!(r.net_successes, 2);
        assert_eq!(r.botches, 2);
        assert!(!r.is_fumble());
        assert_eq!(r.count(), 5);
    }

    #[test]
    fn botches_do_not_subtract() {
        let cfg = ResolutionConfig::default();
        let r = RollResult::from_faces(d10_faces(&[1, 1, 1, 9]), &cfg);
        assert_eq!(r.net_successes, 1);
        assert_eq!(r.botches, 3);
    }

    #[test]
    fn fumble_needs_a_botch() {
        let cfg = ResolutionConfig::default();
        let blank = RollResult::from_faces(d10_faces(&[2, 4, 6]), &cfg);
        assert!(!blank.is_fumble());
        let fumble = RollResult::from_faces(d10_faces(&[2, 1, 6]), &cfg);
        assert!(fumble.is_fumble());
    }

    #[test]
    fn thresholds_follow_die_size() {
        let cfg = ResolutionConfig::default();
        let faces = vec![
            DieFace {
                die: DieSize::D6,
                value: 5,
            },
            DieFace {
                die: DieSize::D4,
                value: 3,
            },
        ];
        let r = RollResult::from_faces(faces, &cfg);
        assert_eq!(r.net_successes, 1);
    }

    #[test]
    fn empty_result() {
        let r = RollResult::default();
        assert_eq!(r.net_successes, 0);
        assert_eq!(r.botches, 0);
        assert!(!r.is_fumble());
    }

    #[test]
    fn absorb_sums_counts() {
        let mut a = RollResult::from_counts(2, 0);
        a.absorb(RollResult::from_counts(2, 1));
        assert_eq!(a.net_successes, 4);
        assert_eq!(a.botches, 1);
    }

    #[test]
    fn display() {
        let cfg = ResolutionConfig::default();
        let r = RollResult::from_faces(d10_faces(&[3, 8]), &cfg);
        assert_eq!(r.to_string(), "[3, 8] = 1 successes, 0 botches");
    }
}
