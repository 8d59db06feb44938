#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Dice resolution for Tatooine Rescue.
//!
//! The die is a flat list of faces; repeating a face weights it. Outcomes and
//! presentation spins draw from separate ChaCha streams, so any number of
//! spins leaves the settled outcome sequence untouched.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tatooine_rescue_core::DiceFace;
use thiserror::Error;
use tracing::{debug, trace};

const SPIN_STREAM: u64 = 1;

/// Face list of the reference die: three swords and three feet.
pub const STANDARD_FACES: [DiceFace; 6] = [
    DiceFace::Sword,
    DiceFace::Sword,
    DiceFace::Sword,
    DiceFace::Foot,
    DiceFace::Foot,
    DiceFace::Foot,
];

/// Reasons a dice operation is refused.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    /// The die was configured without faces.
    #[error("a die needs at least one face")]
    NoFaces,
    /// A roll is already in flight.
    #[error("the die is still rolling")]
    Busy,
    /// No roll is in flight to settle.
    #[error("the die is not rolling")]
    Idle,
}

/// Action die with a configurable face distribution.
#[derive(Clone, Debug)]
pub struct Dice {
    faces: Vec<DiceFace>,
    outcome_rng: ChaCha8Rng,
    spin_rng: ChaCha8Rng,
    rolling: bool,
}

impl Dice {
    /// Creates a die over the provided faces, seeded deterministically.
    pub fn new(faces: Vec<DiceFace>, seed: u64) -> Result<Self, DiceError> {
        if faces.is_empty() {
            return Err(DiceError::NoFaces);
        }
        Ok(Self::seeded(faces, seed))
    }

    /// Creates the reference three-sword, three-foot die.
    #[must_use]
    pub fn standard(seed: u64) -> Self {
        Self::seeded(STANDARD_FACES.to_vec(), seed)
    }

    /// Restarts both streams from `seed`, keeping the faces and abandoning
    /// any roll in flight.
    pub fn reseed(&mut self, seed: u64) {
        let faces = std::mem::take(&mut self.faces);
        *self = Self::seeded(faces, seed);
    }

    fn seeded(faces: Vec<DiceFace>, seed: u64) -> Self {
        let outcome_rng = ChaCha8Rng::seed_from_u64(seed);
        let mut spin_rng = ChaCha8Rng::seed_from_u64(seed);
        spin_rng.set_stream(SPIN_STREAM);
        Self {
            faces,
            outcome_rng,
            spin_rng,
            rolling: false,
        }
    }

    /// Faces printed on the die.
    #[must_use]
    pub fn faces(&self) -> &[DiceFace] {
        &self.faces
    }

    /// Reports whether a roll is in flight.
    #[must_use]
    pub const fn is_rolling(&self) -> bool {
        self.rolling
    }

    /// Starts a roll. Fails with [`DiceError::Busy`] while another is in flight.
    pub fn begin_roll(&mut self) -> Result<(), DiceError> {
        if self.rolling {
            return Err(DiceError::Busy);
        }
        self.rolling = true;
        Ok(())
    }

    /// Draws a face to show while the die spins. Returns `None` when idle.
    pub fn spin(&mut self) -> Option<DiceFace> {
        if !self.rolling {
            return None;
        }
        let face = draw(&self.faces, &mut self.spin_rng);
        trace!(?face, "dice spin");
        Some(face)
    }

    /// Finishes the roll in flight and returns its outcome.
    pub fn settle(&mut self) -> Result<DiceFace, DiceError> {
        if !self.rolling {
            return Err(DiceError::Idle);
        }
        self.rolling = false;
        let face = draw(&self.faces, &mut self.outcome_rng);
        debug!(?face, "dice settled");
        Ok(face)
    }

    /// Starts and settles a roll in one step.
    pub fn roll(&mut self) -> Result<DiceFace, DiceError> {
        self.begin_roll()?;
        self.settle()
    }
}

fn draw(faces: &[DiceFace], rng: &mut ChaCha8Rng) -> DiceFace {
    let index = rng.gen_range(0..faces.len());
    faces[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_face_list_is_rejected() {
        assert_eq!(Dice::new(Vec::new(), 1).err(), Some(DiceError::NoFaces));
    }

    #[test]
    fn concurrent_rolls_are_busy() {
        let mut dice = Dice::standard(3);
        dice.begin_roll().expect("first roll starts");
        assert_eq!(dice.begin_roll(), Err(DiceError::Busy));
        assert_eq!(dice.roll(), Err(DiceError::Busy));
        assert!(dice.settle().is_ok());
        assert!(!dice.is_rolling());
    }

    #[test]
    fn reseeding_replays_from_the_start() {
        let mut dice = Dice::new(vec![DiceFace::Sword, DiceFace::Foot], 9).expect("valid die");
        let first: Vec<_> = (0..16).map(|_| dice.roll()).collect();

        dice.begin_roll().expect("roll starts");
        dice.reseed(9);

        assert!(!dice.is_rolling());
        assert_eq!(dice.faces(), &[DiceFace::Sword, DiceFace::Foot]);
        let replay: Vec<_> = (0..16).map(|_| dice.roll()).collect();
        assert_eq!(first, replay);
    }

    #[test]
    fn settling_without_a_roll_is_idle() {
        let mut dice = Dice::standard(3);
        assert_eq!(dice.settle(), Err(DiceError::Idle));
        assert_eq!(dice.spin(), None);
    }
}
