//! Testing utilities for exact, scripted rolls.
//!
//! Seeded generators make rolls reproducible but not chosen. When a test
//! needs a specific face on a specific die, feed the engine a
//! [`ScriptedFaces`] queue instead of an RNG.

use std::collections::VecDeque;

use crate::dice::{DieSize, DieSource};

/// A [`DieSource`] that hands out a fixed sequence of faces.
///
/// Panics when the queue runs dry or a scripted face does not fit the die
/// being rolled, since either means the test scripted the wrong roll.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFaces {
    faces: VecDeque<u32>,
}

impl ScriptedFaces {
    /// Create a source that yields `faces` in order.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    /// A source with nothing scripted, for rolls that must not draw.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append more faces to the end of the queue.
    pub fn push(&mut self, faces: impl IntoIterator<Item = u32>) {
        self.faces.extend(faces);
    }

    /// How many scripted faces have not been drawn yet.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DieSource for ScriptedFaces {
    fn roll_die(&mut self, die: DieSize) -> u32 {
        let Some(face) = self.faces.pop_front() else {
            panic!("scripted faces exhausted while rolling a {die}");
        };
        assert!(
            (1..=die.sides()).contains(&face),
            "scripted face {face} does not fit a {die}"
        );
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_in_order() {
        let mut source = ScriptedFaces::new([3, 9]);
        assert_eq!(source.roll_die(DieSize::D10), 3);
        assert_eq!(source.roll_die(DieSize::D10), 9);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn push_extends_queue() {
        let mut source = ScriptedFaces::empty();
        source.push([4]);
        assert_eq!(source.roll_die(DieSize::D4), 4);
    }

    #[test]
    #[should_panic(expected = "exhausted")]
    fn exhausted_panics() {
        let mut source = ScriptedFaces::empty();
        source.roll_die(DieSize::D10);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn oversized_face_panics() {
        let mut source = ScriptedFaces::new([9]);
        source.roll_die(DieSize::D6);
    }
}
