use std::path::PathBuf;

use croprot_engine::GameState;

use crate::{
    command::common::{GameArg, SearchArg, Setup},
    schema::session_record::SessionRecord,
    util::Output,
    view::PlanView,
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlanArg {
    #[clap(flatten)]
    game: GameArg,
    #[clap(flatten)]
    search: SearchArg,
    /// Continue from a session saved by `play --record`
    #[arg(long)]
    history: Option<PathBuf>,
    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    format: Format,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlanArg) -> anyhow::Result<()> {
    let PlanArg {
        game,
        search,
        history,
        format,
        output,
    } = arg;

    let setup = Setup::load(game, search)?;
    let state = match history {
        Some(path) => current_state(&SessionRecord::open(path)?)?,
        None => setup.initial_state()?,
    };
    let result = setup.planner()?.plan(&state)?;

    match format {
        Format::Json => Output::save_json(&result, output.as_deref())?,
        Format::Text => {
            let mut out = Output::from_output_path(output.as_deref())?;
            out.write_text(&PlanView(&result).to_string())?;
        }
    }
    Ok(())
}

fn current_state(record: &SessionRecord) -> anyhow::Result<GameState> {
    let history = record.to_history()?;
    tracing::debug!(rounds = history.len(), "session loaded");
    Ok(history.current().clone())
}
