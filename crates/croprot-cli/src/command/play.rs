//! Interactive harvest: the planner recommends, the player reports.
//!
//! Commands read from stdin, one per line:
//!
//! - `s` / `f` - the recommended activation succeeded / failed
//! - `s 2.1` - report a different field (plot 2, field 1) instead
//! - `s 1.2=4/1/0 3.1=5/0/0` - also give the T2/T3/T4 totals read off the
//!   game for upgraded fields
//! - `u` - undo the last round
//! - `q` - quit

use std::{
    io::{self, BufRead as _, Write as _},
    path::PathBuf,
};

use anyhow::Context;
use croprot_engine::{
    Activation, ActualUpgrades, FieldId, FieldObservation, GameState, History, ObservedTiers,
    Outcome,
};

use crate::{
    command::common::{GameArg, SearchArg, Setup},
    schema::session_record::SessionRecord,
    view::PlanView,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    game: GameArg,
    #[clap(flatten)]
    search: SearchArg,
    /// Resume a session saved by an earlier `--record`
    #[arg(long)]
    resume: Option<PathBuf>,
    /// Save the session to this file when it ends
    #[arg(long)]
    record: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PlayCommand {
    Report {
        outcome: Outcome,
        field: Option<FieldId>,
        actual: ActualUpgrades,
    },
    Undo,
    Quit,
    Help,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        game,
        search,
        resume,
        record,
    } = arg;

    let setup = Setup::load(game, search)?;
    let planner = setup.planner()?;
    let (plots, mut history) = match resume {
        Some(path) => {
            let saved = SessionRecord::open(path)?;
            let history = saved.to_history()?;
            (saved.plots, history)
        }
        None => (setup.plots.clone(), History::new(setup.initial_state()?)),
    };

    let mut lines = io::stdin().lock().lines();
    loop {
        let result = planner.plan(history.current())?;
        print!("{}", PlanView(&result));
        if result.is_complete {
            break;
        }

        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        match parse_command(&line) {
            Ok(PlayCommand::Quit) => break,
            Ok(PlayCommand::Help) => eprintln!("{HELP}"),
            Ok(PlayCommand::Undo) => match history.undo()? {
                Some(undone) => eprintln!("Undid {}", undone.activation),
                None => eprintln!("Nothing to undo"),
            },
            Ok(PlayCommand::Report {
                outcome,
                field,
                actual,
            }) => {
                let activation = match field {
                    Some(id) => activation_at(history.current(), id),
                    None => result
                        .next_activation
                        .context("No activation recommended"),
                };
                let recorded = activation.and_then(|activation| {
                    let actual = (!actual.is_empty()).then_some(actual);
                    history
                        .record(activation, outcome, actual)
                        .map(|_| ())
                        .with_context(|| format!("Cannot record {activation}"))
                });
                if let Err(e) = recorded {
                    eprintln!("{e:#}");
                }
            }
            Err(e) => eprintln!("{e:#}\n{HELP}"),
        }
    }

    if let Some(path) = record {
        SessionRecord::from_history(&plots, &history).save(path)?;
        eprintln!("Session saved to {}", path.display());
    }
    Ok(())
}

const HELP: &str = "commands: s | f [P.F] [P.F=T2/T3/T4 ...], u (undo), q (quit)";

fn parse_command(line: &str) -> anyhow::Result<PlayCommand> {
    let mut tokens = line.split_whitespace();
    let Some(head) = tokens.next() else {
        return Ok(PlayCommand::Help);
    };
    let outcome = match head.to_ascii_lowercase().as_str() {
        "s" | "success" => Outcome::Success,
        "f" | "fail" | "failure" => Outcome::Failure,
        "u" | "undo" => return Ok(PlayCommand::Undo),
        "q" | "quit" => return Ok(PlayCommand::Quit),
        "h" | "help" | "?" => return Ok(PlayCommand::Help),
        other => anyhow::bail!("Unknown command `{other}`"),
    };

    let mut field = None;
    let mut observations = Vec::new();
    for token in tokens {
        match token.split_once('=') {
            Some((id, tiers)) => observations.push(FieldObservation {
                field: parse_field_id(id)?,
                tiers: ObservedTiers::parse_lenient(tiers),
            }),
            None if field.is_none() => field = Some(parse_field_id(token)?),
            None => anyhow::bail!("Only one field can be activated per round: `{token}`"),
        }
    }
    Ok(PlayCommand::Report {
        outcome,
        field,
        actual: observations.into_iter().collect(),
    })
}

/// Parses a 1-based `plot.field` reference such as `2.1`.
fn parse_field_id(input: &str) -> anyhow::Result<FieldId> {
    let (plot, slot) = input
        .split_once('.')
        .with_context(|| format!("Expected PLOT.FIELD, got `{input}`"))?;
    let number = |s: &str| -> anyhow::Result<usize> {
        s.parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .with_context(|| format!("Invalid number `{s}` in `{input}`"))
    };
    Ok(FieldId::new(number(plot)? - 1, number(slot)? - 1))
}

fn activation_at(state: &GameState, id: FieldId) -> anyhow::Result<Activation> {
    let field = state
        .field(id)
        .with_context(|| format!("There is no field {id}"))?;
    Ok(Activation::new(id.plot, field.color(), id.slot))
}
