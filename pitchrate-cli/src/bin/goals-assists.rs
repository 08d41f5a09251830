use std::{error::Error as StdError, io, path::PathBuf};

use clap::Parser as _;
use pitchrate_cli::{
    goals_assists::{goals_and_assists_by_team, PlayerCount},
    init_logging,
    roster::{load_players, load_teams, player_display_name, sort_by_team_name},
    source::read_shards,
};
use rustc_hash::FxHashMap;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Goal scorers and assist providers, per competition and team.
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
    writer.write_record(["Competition", "Team", "Category", "Player", "Count"])?;

    for shard in &shards {
        let by_team = sort_by_team_name(&teams, goals_and_assists_by_team(&shard.events), |team| team.team);
        for (team_name, team) in by_team {
            for (category, counts) in [("goals", &team.scorers), ("assists", &team.providers)] {
                for &PlayerCount { player, count } in counts {
                    writer.write_record([
                        shard.competition.as_str(),
                        team_name.as_str(),
                        category,
                        player_display_name(&roster, player).as_str(),
                        count.to_string().as_str(),
                    ])?;
                }
            }
        }
    }

    writer.flush()?;
    Ok(())
}
