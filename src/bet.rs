use crate::error::SimError;
use crate::roulette::{Color, Outcome, Parity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Even-money bets (1:1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetChoice {
    Red,
    Black,
    Odd,
    Even,
}

impl BetChoice {
    pub const ALL: [BetChoice; 4] = [
        BetChoice::Red,
        BetChoice::Black,
        BetChoice::Odd,
        BetChoice::Even,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BetChoice::Red => "red",
            BetChoice::Black => "black",
            BetChoice::Odd => "odd",
            BetChoice::Even => "even",
        }
    }
}

impl fmt::Display for BetChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetChoice {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(BetChoice::Red),
            "black" => Ok(BetChoice::Black),
            "odd" => Ok(BetChoice::Odd),
            "even" => Ok(BetChoice::Even),
            _ => Err(SimError::invalid("bet_choice", s, "expected one of red, black, odd, even")),
        }
    }
}

/// Check if a bet wins for a given outcome. Zero loses every even-money bet.
pub fn did_win(outcome: Outcome, choice: BetChoice) -> bool {
    match choice {
        BetChoice::Red => outcome.color() == Some(Color::Red),
        BetChoice::Black => outcome.color() == Some(Color::Black),
        BetChoice::Odd => outcome.parity() == Some(Parity::Odd),
        BetChoice::Even => outcome.parity() == Some(Parity::Even),
    }
}
