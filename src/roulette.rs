//! European single-zero wheel.
//!
//! Pockets 0 to 36. Zero is green and belongs to neither color nor parity,
//! every other pocket is either red or black and either odd or even.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Red pockets on a European wheel. Every other non-zero pocket is black.
pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Number of pockets, zero included.
pub const POCKETS: u8 = 37;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Odd,
    Even,
}

/// Result of a single spin as seen by an even-money bettor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Zero,
    RedOdd,
    RedEven,
    BlackOdd,
    BlackEven,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::Zero,
        Outcome::RedOdd,
        Outcome::RedEven,
        Outcome::BlackOdd,
        Outcome::BlackEven,
    ];

    /// Classify a pocket number. Numbers above 36 are not on the wheel.
    pub fn from_number(number: u8) -> Option<Self> {
        if number >= POCKETS {
            return None;
        }
        if number == 0 {
            return Some(Outcome::Zero);
        }
        let red = is_red(number);
        let odd = number % 2 == 1;
        Some(match (red, odd) {
            (true, true) => Outcome::RedOdd,
            (true, false) => Outcome::RedEven,
            (false, true) => Outcome::BlackOdd,
            (false, false) => Outcome::BlackEven,
        })
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Outcome::Zero => None,
            Outcome::RedOdd | Outcome::RedEven => Some(Color::Red),
            Outcome::BlackOdd | Outcome::BlackEven => Some(Color::Black),
        }
    }

    pub fn parity(self) -> Option<Parity> {
        match self {
            Outcome::Zero => None,
            Outcome::RedOdd | Outcome::BlackOdd => Some(Parity::Odd),
            Outcome::RedEven | Outcome::BlackEven => Some(Parity::Even),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Zero => "zero",
            Outcome::RedOdd => "red odd",
            Outcome::RedEven => "red even",
            Outcome::BlackOdd => "black odd",
            Outcome::BlackEven => "black even",
        };
        f.write_str(label)
    }
}

pub fn is_red(number: u8) -> bool {
    RED_NUMBERS.contains(&number)
}

/// A landed pocket and its classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spin {
    pub number: u8,
    pub outcome: Outcome,
}

/// Anything that can hand the simulation one outcome per round.
pub trait OutcomeSource {
    fn next_outcome(&mut self) -> Outcome;
}

/// The wheel, driven by an injected random number generator.
pub struct Roulette<R> {
    rng: R,
}

impl<R: Rng> Roulette<R> {
    pub fn new(rng: R) -> Self {
        Roulette { rng }
    }

    pub fn spin(&mut self) -> Spin {
        let number = self.rng.gen_range(0..POCKETS);
        // gen_range(0..37) never leaves the wheel
        let outcome = Outcome::from_number(number).unwrap_or(Outcome::Zero);
        Spin { number, outcome }
    }
}

impl<R: Rng> OutcomeSource for Roulette<R> {
    fn next_outcome(&mut self) -> Outcome {
        self.spin().outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_is_red() {
        assert!(is_red(1));
        assert!(is_red(3));
        assert!(is_red(32));
        assert!(!is_red(2));
        assert!(!is_red(4));
        assert!(!is_red(0));
    }

    #[test]
    fn test_eighteen_of_each_color() {
        let red = (1..POCKETS).filter(|n| is_red(*n)).count();
        assert_eq!(red, 18);
        assert_eq!((1..POCKETS).count() - red, 18);
    }

    #[test]
    fn test_from_number() {
        assert_eq!(Outcome::from_number(0), Some(Outcome::Zero));
        assert_eq!(Outcome::from_number(1), Some(Outcome::RedOdd));
        assert_eq!(Outcome::from_number(12), Some(Outcome::RedEven));
        assert_eq!(Outcome::from_number(11), Some(Outcome::BlackOdd));
        assert_eq!(Outcome::from_number(2), Some(Outcome::BlackEven));
        assert_eq!(Outcome::from_number(36), Some(Outcome::RedEven));
        assert_eq!(Outcome::from_number(37), None);
    }

    #[test]
    fn test_color_and_parity_partition() {
        for outcome in Outcome::ALL {
            match outcome {
                Outcome::Zero => {
                    assert!(outcome.color().is_none());
                    assert!(outcome.parity().is_none());
                }
                _ => {
                    assert!(outcome.color().is_some());
                    assert!(outcome.parity().is_some());
                }
            }
        }
    }

    #[test]
    fn test_spin_stays_on_wheel() {
        let mut wheel = Roulette::new(StdRng::seed_from_u64(7));
        let mut seen_zero = false;
        for _ in 0..5_000 {
            let spin = wheel.spin();
            assert!(spin.number < POCKETS);
            assert_eq!(Outcome::from_number(spin.number), Some(spin.outcome));
            seen_zero |= spin.outcome == Outcome::Zero;
        }
        // 5000 spins without a zero would be a (1 - 1/37)^5000 event
        assert!(seen_zero);
    }

    #[test]
    fn test_same_seed_same_spins() {
        let mut a = Roulette::new(StdRng::seed_from_u64(42));
        let mut b = Roulette::new(StdRng::seed_from_u64(42));
        for _ in 0..100 {
            assert_eq!(a.spin(), b.spin());
        }
    }
}
