use std::fmt;

use croprot_engine::{GameState, Plot};
use croprot_planner::planner::PlanResult;

/// Text rendering of a harvest.
pub struct StateView<'a>(pub &'a GameState);

impl fmt::Display for StateView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for plot in self.0.plots() {
            writeln!(f, "  {}", PlotView(plot))?;
        }
        let totals = self.0.totals();
        writeln!(
            f,
            "  total  T1 {:3}  T2 {:3}  T3 {:3}  T4 {:3}",
            totals.t1, totals.t2, totals.t3, totals.t4
        )
    }
}

struct PlotView<'a>(&'a Plot);

impl fmt::Display for PlotView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plot = self.0;
        let status = if plot.has_failed() {
            "failed"
        } else if plot.is_active() {
            "open"
        } else {
            "done"
        };
        write!(f, "plot {:2} {} {status:6}", plot.index() + 1, plot.colors())?;
        for field in plot.fields() {
            let seeds = field.seeds();
            write!(
                f,
                " | {} {:>4} T1 {:2} T2 {:2} T3 {:2} T4 {:2}",
                field.color().code(),
                if field.is_used() { "used" } else { "" },
                seeds.t1,
                seeds.t2,
                seeds.t3,
                seeds.t4
            )?;
        }
        Ok(())
    }
}

/// Text rendering of a planning result.
pub struct PlanView<'a>(pub &'a PlanResult);

impl fmt::Display for PlanView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(f, "Harvest:")?;
        write!(f, "{}", StateView(&result.state))?;

        let Some(next) = result.next_activation else {
            writeln!(f, "Harvest complete, final score {:.2}", result.expected_score)?;
            return Ok(());
        };

        writeln!(f)?;
        writeln!(
            f,
            "Next: {next}  expected score {:.2}  risk {}",
            result.expected_score, result.outcome.risk
        )?;
        let plan: Vec<String> = result.best_sequence.iter().map(ToString::to_string).collect();
        writeln!(f, "Plan: {}", plan.join(" -> "))?;
        writeln!(
            f,
            "Expected T3 {:.2}  T4 {:.2}",
            result.outcome.expected_t3, result.outcome.expected_t4
        )?;

        writeln!(f, "Scores:")?;
        for entry in &result.score_table {
            write!(f, "  {:28} {:8.2}", entry.label, entry.score)?;
            if entry.bonus > 0.0 {
                write!(f, "  (+{:.0} bonus)", entry.bonus)?;
            }
            writeln!(f, "  {} sequences", entry.evaluations)?;
        }

        writeln!(f, "Scenarios:")?;
        for scenario in &result.outcome.scenarios {
            writeln!(
                f,
                "  {:5.1}%  T3 {:3}  T4 {:3}  {}",
                scenario.probability * 100.0,
                scenario.total_t3,
                scenario.total_t4,
                scenario.label
            )?;
        }

        let d = &result.diagnostics;
        write!(
            f,
            "Searched {} of {} sequences (depth {}), cache {} entries / {} hits",
            d.sequences_evaluated, d.sequences_generated, d.lookahead_depth, d.cache_size, d.cache_hits
        )?;
        if d.truncated {
            write!(f, ", truncated")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use croprot_engine::{Color, ColorPair};
    use croprot_planner::{config::PlannerConfig, planner::Planner};

    use super::*;

    #[test]
    fn test_plan_view_names_the_recommendation() {
        let state = GameState::new(
            &[
                ColorPair(Color::Yellow, Color::Red),
                ColorPair(Color::Blue, Color::Red),
            ],
            23,
        )
        .unwrap();
        let result = Planner::new(PlannerConfig::default())
            .unwrap()
            .plan(&state)
            .unwrap();
        let text = PlanView(&result).to_string();
        let next = result.next_activation.unwrap().to_string();
        assert!(text.contains(&format!("Next: {next}")));
        assert!(text.contains("plot  1 YR open"));
        assert!(text.contains("Scenarios:"));
    }
}
