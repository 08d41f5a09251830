use std::{error::Error as StdError, fs::File, io, path::PathBuf};

use clap::Parser as _;
use pitchrate::{RatingConfig, RatingEngine, RatingKind, ReportRenderer as _, SortKey};
use pitchrate_cli::{
    init_logging,
    report::CsvRenderer,
    roster::{load_players, load_primary_positions},
    settings::Settings,
    source::read_shards,
};
use tracing::info;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Rates players from a directory of per-competition event files.
#[derive(clap::Parser)]
struct Opt {
    /// passing, crossing, long_passing, tackling, creativity or pace.
    #[clap(long, default_value = "passing")]
    kind: RatingKind,
    /// Directory containing events_<competition>.json files.
    #[clap(long)]
    events: PathBuf,
    /// players.json of the data provider.
    #[clap(long)]
    players: PathBuf,
    /// CSV with playerId,best_fit_role columns.
    #[clap(long)]
    positions: Option<PathBuf>,
    /// TOML settings with a preset and overrides, or a complete rating.
    #[clap(long)]
    config: Option<PathBuf>,
    /// Write the CSV here instead of stdout.
    #[clap(long)]
    output: Option<PathBuf>,
    /// score, name or player.
    #[clap(long)]
    sort: Option<SortKey>,
    #[clap(long)]
    min_games: Option<u32>,
}

fn main() -> Result<(), Box<dyn StdError>> {
    init_logging();
    let opt = Opt::parse();

    let mut config = match opt.config {
        Some(ref path) => Settings::load(path)?.into_config(opt.kind),
        None => RatingConfig::preset(opt.kind),
    };
    if let Some(sort) = opt.sort {
        config.sort = sort;
    }
    if let Some(min_games) = opt.min_games {
        config.min_games = min_games;
    }

    let mut roster = load_players(&opt.players)?;
    if let Some(ref positions) = opt.positions {
        load_primary_positions(&mut roster, positions)?;
    }

    let engine = RatingEngine::new(config, &roster)?;
    let shards = read_shards(&opt.events)?;
    let aggregates = engine.par_aggregate(&shards);
    let table = engine.rate(&aggregates);

    match opt.output {
        Some(ref path) => {
            CsvRenderer::new(File::create(path)?).render(&table)?;
            info!(path = %path.display(), records = table.len(), "wrote ratings");
        }
        None => CsvRenderer::new(io::stdout().lock()).render(&table)?,
    }

    Ok(())
}
