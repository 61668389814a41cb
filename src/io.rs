//! Seams between the simulation and whatever collects parameters or shows
//! results (the bot, the CLI, a log).

use crate::config::{ConfigData, SimulationDefaults};
use crate::error::{SimError, SimResult};
use crate::simulation::{SimulationParameters, SimulationReport, StopPolicy};
use anyhow::Result;
use log::info;

pub trait ParameterSource {
    fn parameters(&self) -> SimResult<SimulationParameters>;
}

pub trait ResultSink {
    fn publish(&mut self, params: &SimulationParameters, report: &SimulationReport) -> Result<()>;
}

/// Raw text fields, as a form or a command line hands them over.
#[derive(Clone, Debug, Default)]
pub struct FormFields {
    pub starting_balance: String,
    pub bet_amount: String,
    pub strategy: String,
    pub rounds: String,
    pub bet_choice: String,
    /// Empty means the default policy.
    pub stop_policy: String,
    pub max_rounds: Option<u32>,
}

/// Reject a run longer than `max_rounds`.
pub fn check_round_cap(
    params: SimulationParameters,
    max_rounds: u32,
) -> SimResult<SimulationParameters> {
    if params.rounds > max_rounds {
        return Err(SimError::invalid(
            "rounds",
            params.rounds.to_string(),
            format!("at most {} rounds per run", max_rounds),
        ));
    }
    Ok(params)
}

fn parse_whole(name: &'static str, raw: &str) -> SimResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SimError::invalid(name, raw, "not a whole number"))
}

impl ParameterSource for FormFields {
    fn parameters(&self) -> SimResult<SimulationParameters> {
        let stop_policy = if self.stop_policy.trim().is_empty() {
            StopPolicy::default()
        } else {
            self.stop_policy.parse()?
        };
        let params = SimulationParameters::new(
            parse_whole("starting_balance", &self.starting_balance)?,
            parse_whole("bet_amount", &self.bet_amount)?,
            self.strategy.parse()?,
            parse_whole("rounds", &self.rounds)?,
            self.bet_choice.parse()?,
            stop_policy,
        )?;
        match self.max_rounds {
            Some(max_rounds) => check_round_cap(params, max_rounds),
            None => Ok(params),
        }
    }
}

/// Configured defaults overlaid with whatever options the user supplied.
#[derive(Clone, Debug, Default)]
pub struct SimulationRequest {
    pub defaults: SimulationDefaults,
    pub max_rounds: u32,
    pub starting_balance: Option<i64>,
    pub bet_amount: Option<i64>,
    pub strategy: Option<String>,
    pub rounds: Option<i64>,
    pub bet_choice: Option<String>,
    pub stop_on_first_win: Option<bool>,
}

impl SimulationRequest {
    pub fn from_config(config: &ConfigData) -> Self {
        SimulationRequest {
            defaults: config.defaults.clone(),
            max_rounds: config.max_rounds,
            ..Default::default()
        }
    }
}

impl ParameterSource for SimulationRequest {
    fn parameters(&self) -> SimResult<SimulationParameters> {
        let d = &self.defaults;
        let strategy = match &self.strategy {
            Some(s) => s.parse()?,
            None => d.strategy,
        };
        let bet_choice = match &self.bet_choice {
            Some(s) => s.parse()?,
            None => d.bet_choice,
        };
        let stop_policy = match self.stop_on_first_win {
            Some(true) => StopPolicy::FirstWin,
            Some(false) => StopPolicy::AllRounds,
            None => d.stop_policy,
        };
        let params = SimulationParameters::new(
            self.starting_balance.unwrap_or(d.starting_balance),
            self.bet_amount.unwrap_or(d.bet_amount),
            strategy,
            self.rounds.unwrap_or(d.rounds),
            bet_choice,
            stop_policy,
        )?;
        check_round_cap(params, self.max_rounds)
    }
}

/// Human readable lines for one run.
pub fn summary_lines(params: &SimulationParameters, report: &SimulationReport) -> Vec<String> {
    vec![
        format!(
            "Final balance: {} (start: {}, net {:+})",
            report.final_balance,
            report.starting_balance,
            report.net()
        ),
        format!("Wins: {}", report.wins),
        format!("Losses: {}", report.losses),
        format!(
            "Rounds played: {} of {} ({})",
            report.rounds_played, params.rounds, report.stop_reason
        ),
    ]
}

/// Collects the summary text for a caller that displays it later.
#[derive(Debug, Default)]
pub struct TextSummary {
    pub lines: Vec<String>,
}

impl TextSummary {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl ResultSink for TextSummary {
    fn publish(&mut self, params: &SimulationParameters, report: &SimulationReport) -> Result<()> {
        self.lines.push(format!(
            "{} on {}, base bet {}",
            params.strategy, params.bet_choice, params.bet_amount
        ));
        self.lines.extend(summary_lines(params, report));
        Ok(())
    }
}

/// Writes the summary through the `log` facade.
pub struct LogSink;

impl ResultSink for LogSink {
    fn publish(&mut self, params: &SimulationParameters, report: &SimulationReport) -> Result<()> {
        info!(
            "{} on {} (base {}): {}",
            params.strategy,
            params.bet_choice,
            params.bet_amount,
            summary_lines(params, report).join(", ")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet::BetChoice;
    use crate::simulation::{StopReason, Strategy};

    fn form() -> FormFields {
        FormFields {
            starting_balance: "100".into(),
            bet_amount: "10".into(),
            strategy: "martingale".into(),
            rounds: "50".into(),
            bet_choice: "odd".into(),
            stop_policy: String::new(),
            max_rounds: None,
        }
    }

    #[test]
    fn test_form_fields_parse() {
        let params = form().parameters().unwrap();
        assert_eq!(params.starting_balance, 100);
        assert_eq!(params.bet_amount, 10);
        assert_eq!(params.strategy, Strategy::Martingale);
        assert_eq!(params.rounds, 50);
        assert_eq!(params.bet_choice, BetChoice::Odd);
        assert_eq!(params.stop_policy, StopPolicy::AllRounds);
    }

    #[test]
    fn test_form_rejects_non_numeric() {
        let mut f = form();
        f.bet_amount = "ten".into();
        let err = f.parameters().unwrap_err();
        assert_eq!(err, SimError::invalid("bet_amount", "ten", "not a whole number"));

        let mut f = form();
        f.rounds = "".into();
        assert!(matches!(
            f.parameters().unwrap_err(),
            SimError::InvalidParameter { name: "rounds", .. }
        ));
    }

    #[test]
    fn test_form_negative_rounds_is_empty_run() {
        let mut f = form();
        f.rounds = "-3".into();
        assert_eq!(f.parameters().unwrap().rounds, 0);
    }

    #[test]
    fn test_form_enforces_round_cap() {
        let mut f = form();
        f.rounds = "4000000000".into();
        f.max_rounds = Some(10_000);
        let err = f.parameters().unwrap_err();
        let expected = SimError::invalid("rounds", "4000000000", "at most 10000 rounds per run");
        assert_eq!(err, expected);

        f.rounds = "10000".into();
        assert_eq!(f.parameters().unwrap().rounds, 10_000);
    }

    #[test]
    fn test_form_unknown_choice() {
        let mut f = form();
        f.bet_choice = "green".into();
        assert!(matches!(
            f.parameters().unwrap_err(),
            SimError::InvalidParameter { name: "bet_choice", .. }
        ));
    }

    #[test]
    fn test_request_overlays_defaults() {
        let mut request = SimulationRequest::from_config(&ConfigData::default());
        request.bet_amount = Some(25);
        request.bet_choice = Some("black".into());
        request.stop_on_first_win = Some(true);
        let params = request.parameters().unwrap();
        assert_eq!(params.starting_balance, 1000);
        assert_eq!(params.bet_amount, 25);
        assert_eq!(params.bet_choice, BetChoice::Black);
        assert_eq!(params.strategy, Strategy::Flat);
        assert_eq!(params.stop_policy, StopPolicy::FirstWin);
    }

    #[test]
    fn test_request_enforces_round_cap() {
        let mut request = SimulationRequest::from_config(&ConfigData::default());
        request.rounds = Some(10_001);
        assert!(matches!(
            request.parameters().unwrap_err(),
            SimError::InvalidParameter { name: "rounds", .. }
        ));
        request.rounds = Some(10_000);
        assert!(request.parameters().is_ok());
    }

    #[test]
    fn test_text_summary() {
        let params = form().parameters().unwrap();
        let report = SimulationReport {
            starting_balance: 100,
            final_balance: 100,
            wins: 1,
            losses: 1,
            rounds_played: 2,
            trajectory: vec![90, 100],
            stop_reason: StopReason::RoundsExhausted,
        };
        let mut sink = TextSummary::default();
        sink.publish(&params, &report).unwrap();
        let text = sink.text();
        assert!(text.contains("Final balance: 100 (start: 100, net +0)"));
        assert!(text.contains("Wins: 1"));
        assert!(text.contains("Losses: 1"));
        assert!(text.contains("Rounds played: 2 of 50 (round limit reached)"));
    }
}
