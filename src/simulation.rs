//! Round-by-round bankroll simulation.
//!
//! Every run starts from a fresh [`SimulationState`]. Outcomes come from an
//! [`OutcomeSource`], so the loop itself is a pure function of its inputs.

use crate::bet::{did_win, BetChoice};
use crate::error::{SimError, SimResult};
use crate::roulette::OutcomeSource;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Same stake every round
    Flat,
    /// Double after a loss, back to the base bet after a win
    Martingale,
}

impl Strategy {
    /// Stake for the round after one settled at `current`.
    pub fn next_stake(self, base: i64, current: i64, won: bool) -> i64 {
        match self {
            Strategy::Flat => current,
            Strategy::Martingale if won => base,
            Strategy::Martingale => current.saturating_mul(2),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Flat => "flat",
            Strategy::Martingale => "martingale",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Strategy::Flat),
            "martingale" => Ok(Strategy::Martingale),
            _ => Err(SimError::invalid("strategy", s, "expected flat or martingale")),
        }
    }
}

/// When a run ends early and which rounds make it into the trajectory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopPolicy {
    /// Play the whole round budget. Stop once the balance goes below zero,
    /// leaving that round out of the trajectory.
    #[default]
    AllRounds,
    /// Stop right after the first recorded win. Stop once the balance reaches
    /// zero or less, leaving that round out of the trajectory.
    FirstWin,
}

impl StopPolicy {
    fn is_bankrupt(self, balance: i64) -> bool {
        match self {
            StopPolicy::AllRounds => balance < 0,
            StopPolicy::FirstWin => balance <= 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StopPolicy::AllRounds => "all-rounds",
            StopPolicy::FirstWin => "first-win",
        }
    }
}

impl FromStr for StopPolicy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all-rounds" => Ok(StopPolicy::AllRounds),
            "first-win" => Ok(StopPolicy::FirstWin),
            _ => Err(SimError::invalid("stop_policy", s, "expected all-rounds or first-win")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub starting_balance: i64,
    pub bet_amount: i64,
    pub strategy: Strategy,
    pub rounds: u32,
    pub bet_choice: BetChoice,
    #[serde(default)]
    pub stop_policy: StopPolicy,
}

impl SimulationParameters {
    /// Validated constructor. Balance and bet must be positive; a negative
    /// round limit means "play nothing".
    pub fn new(
        starting_balance: i64,
        bet_amount: i64,
        strategy: Strategy,
        rounds: i64,
        bet_choice: BetChoice,
        stop_policy: StopPolicy,
    ) -> SimResult<Self> {
        if starting_balance <= 0 {
            return Err(SimError::invalid(
                "starting_balance",
                starting_balance.to_string(),
                "must be greater than zero",
            ));
        }
        if bet_amount <= 0 {
            return Err(SimError::invalid(
                "bet_amount",
                bet_amount.to_string(),
                "must be greater than zero",
            ));
        }
        let rounds = u32::try_from(rounds.max(0))
            .map_err(|_| SimError::invalid("rounds", rounds.to_string(), "too many rounds"))?;
        Ok(SimulationParameters {
            starting_balance,
            bet_amount,
            strategy,
            rounds,
            bet_choice,
            stop_policy,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    RoundsExhausted,
    Bankrupt,
    FirstWin,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StopReason::RoundsExhausted => "round limit reached",
            StopReason::Bankrupt => "bankroll depleted",
            StopReason::FirstWin => "stopped on first win",
        };
        f.write_str(label)
    }
}

/// Mutable bookkeeping for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationState {
    pub balance: i64,
    pub current_bet: i64,
    pub trajectory: Vec<i64>,
    pub wins: u32,
    pub losses: u32,
}

impl SimulationState {
    pub fn new(params: &SimulationParameters) -> Self {
        SimulationState {
            balance: params.starting_balance,
            current_bet: params.bet_amount,
            trajectory: Vec::new(),
            wins: 0,
            losses: 0,
        }
    }

    /// Settle one round at 1:1 and move the stake along the strategy.
    pub fn settle(&mut self, won: bool, params: &SimulationParameters) {
        if won {
            self.balance = self.balance.saturating_add(self.current_bet);
            self.wins += 1;
        } else {
            self.balance = self.balance.saturating_sub(self.current_bet);
            self.losses += 1;
        }
        self.current_bet = params.strategy.next_stake(params.bet_amount, self.current_bet, won);
    }

    pub fn rounds_played(&self) -> u32 {
        self.wins + self.losses
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub starting_balance: i64,
    pub final_balance: i64,
    pub wins: u32,
    pub losses: u32,
    pub rounds_played: u32,
    pub trajectory: Vec<i64>,
    pub stop_reason: StopReason,
}

impl SimulationReport {
    pub fn net(&self) -> i64 {
        self.final_balance - self.starting_balance
    }
}

/// Run one simulation to completion.
pub fn simulate<S: OutcomeSource + ?Sized>(
    params: &SimulationParameters,
    source: &mut S,
) -> SimulationReport {
    let mut state = SimulationState::new(params);
    let mut stop_reason = StopReason::RoundsExhausted;

    for round in 0..params.rounds {
        let outcome = source.next_outcome();
        let won = did_win(outcome, params.bet_choice);
        let stake = state.current_bet;
        state.settle(won, params);
        trace!(
            "round {}: {} on {} stake {} -> {} balance {}",
            round + 1,
            outcome,
            params.bet_choice,
            stake,
            if won { "win" } else { "loss" },
            state.balance
        );

        if won {
            state.trajectory.push(state.balance);
            if params.stop_policy == StopPolicy::FirstWin {
                stop_reason = StopReason::FirstWin;
                break;
            }
        } else {
            if params.stop_policy.is_bankrupt(state.balance) {
                stop_reason = StopReason::Bankrupt;
                break;
            }
            state.trajectory.push(state.balance);
        }
    }

    debug!(
        "simulation finished: {} after {} rounds, balance {} -> {} ({} wins, {} losses)",
        stop_reason,
        state.rounds_played(),
        params.starting_balance,
        state.balance,
        state.wins,
        state.losses
    );

    SimulationReport {
        starting_balance: params.starting_balance,
        final_balance: state.balance,
        wins: state.wins,
        losses: state.losses,
        rounds_played: state.rounds_played(),
        trajectory: state.trajectory,
        stop_reason,
    }
}
