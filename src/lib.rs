pub mod bet;
pub mod chart;
pub mod config;
pub mod error;
pub mod io;
pub mod roulette;
pub mod simulation;

use anyhow::Result;
use rand::Rng;

use crate::chart::{render_balance_chart, ChartStyle, Surface};
use crate::io::{ParameterSource, ResultSink};
use crate::roulette::Roulette;
use crate::simulation::{simulate, SimulationParameters, SimulationReport};

/// Read parameters, run one simulation on a fresh wheel, hand the report to
/// every sink and draw the trajectory on `surface`.
pub fn run<P, R, S>(
    source: &P,
    rng: R,
    sinks: &mut [&mut dyn ResultSink],
    surface: &mut S,
    style: &ChartStyle,
) -> Result<(SimulationParameters, SimulationReport)>
where
    P: ParameterSource + ?Sized,
    R: Rng,
    S: Surface + ?Sized,
{
    let params = source.parameters()?;
    let report = simulate(&params, &mut Roulette::new(rng));
    for sink in sinks.iter_mut() {
        sink.publish(&params, &report)?;
    }
    render_balance_chart(surface, &report.trajectory, style);
    Ok((params, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::SvgSurface;
    use crate::error::SimError;
    use crate::io::{FormFields, TextSummary};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn form(bet_amount: &str) -> FormFields {
        FormFields {
            starting_balance: "200".into(),
            bet_amount: bet_amount.into(),
            strategy: "martingale".into(),
            rounds: "40".into(),
            bet_choice: "red".into(),
            stop_policy: "".into(),
            max_rounds: Some(1_000),
        }
    }

    #[test]
    fn test_run_wires_everything() {
        let mut text = TextSummary::default();
        let mut surface = SvgSurface::new(300, 150);
        let (params, report) = run(
            &form("5"),
            StdRng::seed_from_u64(1),
            &mut [&mut text],
            &mut surface,
            &ChartStyle::default(),
        )
        .unwrap();
        assert_eq!(params.rounds, 40);
        assert_eq!(report.rounds_played, report.wins + report.losses);
        assert!(text.text().contains("martingale on red"));
        assert_eq!(surface.to_svg().contains("polyline"), !report.trajectory.is_empty());
    }

    #[test]
    fn test_run_rejects_bad_form() {
        let mut surface = SvgSurface::new(300, 150);
        let err = run(
            &form("x"),
            StdRng::seed_from_u64(1),
            &mut [],
            &mut surface,
            &ChartStyle::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SimError>(),
            Some(SimError::InvalidParameter { name: "bet_amount", .. })
        ));
    }
}
