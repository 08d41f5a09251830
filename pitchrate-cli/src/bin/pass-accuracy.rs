use std::{error::Error as StdError, io, path::PathBuf};

use clap::Parser as _;
use pitchrate_cli::{
    init_logging,
    pass_accuracy::pass_accuracy_by_team,
    roster::{load_players, load_teams, player_display_name, sort_by_team_name},
    source::read_shards,
};
use rustc_hash::FxHashMap;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Pass accuracy of every regular passer, per competition and team.
#[derive(clap::Parser)]
struct Opt {
    /// Directory containing events_<competition>.json files.
    #[clap(long)]
    events: PathBuf,
    #[clap(long)]
    players: PathBuf,
    /// teams.json of the data provider, for team names.
    #[clap(long)]
    teams: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn StdError>> {
    init_logging();
    let opt = Opt::parse();

    let roster = load_players(&opt.players)?;
    let teams = match opt.teams {
        Some(ref path) => load_teams(path)?,
        None => FxHashMap::default(),
    };
    let shards = read_shards(&opt.events)?;

    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    writer.write_record(["Competition", "Team", "Player", "Completed", "Attempted", "Accuracy"])?;

    for shard in &shards {
        let by_team = sort_by_team_name(&teams, pass_accuracy_by_team(&shard.events), |team| team.team);
        for (team_name, team) in by_team {
            for player in &team.players {
                writer.write_record([
                    shard.competition.clone(),
                    team_name.clone(),
                    player_display_name(&roster, player.player),
                    player.passes.success.to_string(),
                    player.passes.total.to_string(),
                    format!("{:.2}", 100.0 * player.accuracy()),
                ])?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}
