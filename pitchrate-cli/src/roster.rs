use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use pitchrate::{PlayerId, PlayerInfo, Role, Roster, RosterLookup, TeamId};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("could not read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid player data in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid primary positions in {path:?}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawPlayer {
    wy_id: u64,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    role: Option<RawRole>,
}

#[derive(Deserialize, Debug)]
struct RawRole {
    #[serde(default)]
    code2: Option<String>,
    #[serde(default)]
    code3: Option<String>,
}

impl RawPlayer {
    fn name(&self) -> String {
        match self.short_name.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => clean_name(name),
            None => clean_name(&format!(
                "{} {}",
                self.first_name.as_deref().unwrap_or_default(),
                self.last_name.as_deref().unwrap_or_default()
            )),
        }
    }

    fn role(&self) -> Role {
        self.role
            .as_ref()
            .and_then(|role| role.code3.as_deref().or(role.code2.as_deref()))
            .map_or(Role::Unknown, Role::from_code)
    }
}

/// Decodes literal `\uXXXX` escapes (including surrogate pairs) left over
/// from double encoding, then strips zero-width and private-use
/// characters.
pub fn clean_name(raw: &str) -> String {
    let mut units: Vec<u16> = Vec::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(c) = rest.chars().next() {
        if let Some(unit) = rest
            .strip_prefix("\\u")
            .and_then(|hex| hex.get(..4))
            .and_then(|hex| u16::from_str_radix(hex, 16).ok())
        {
            units.push(unit);
            rest = &rest[6..];
        } else {
            let mut buf = [0; 2];
            units.extend_from_slice(c.encode_utf16(&mut buf));
            rest = &rest[c.len_utf8()..];
        }
    }

    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .filter(|&c| !is_invisible(c))
        .collect::<String>()
        .trim()
        .to_owned()
}

fn is_invisible(c: char) -> bool {
    matches!(c, '\u{200b}'..='\u{200d}' | '\u{2060}' | '\u{feff}' | '\u{e000}'..='\u{f8ff}')
}

fn open(path: &Path) -> Result<BufReader<File>, RosterError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| RosterError::Io {
            path: path.to_owned(),
            source,
        })
}

/// Loads the provider's `players.json`.
pub fn load_players(path: &Path) -> Result<Roster, RosterError> {
    let raw: Vec<RawPlayer> =
        serde_json::from_reader(open(path)?).map_err(|source| RosterError::Json {
            path: path.to_owned(),
            source,
        })?;

    let roster: Roster = raw
        .into_iter()
        .map(|player| {
            let info = PlayerInfo {
                name: player.name(),
                role: player.role(),
                primary_position: None,
            };
            (PlayerId(player.wy_id), info)
        })
        .collect();
    info!(players = roster.len(), "loaded roster");
    Ok(roster)
}

#[derive(Deserialize, Debug)]
struct PrimaryPositionRow {
    #[serde(rename = "playerId")]
    player_id: u64,
    best_fit_role: String,
}

/// Reads a `playerId,best_fit_role` CSV and assigns primary positions to
/// players of the roster. Returns the number of players assigned.
pub fn load_primary_positions(roster: &mut Roster, path: &Path) -> Result<usize, RosterError> {
    let csv_error = |source| RosterError::Csv {
        path: path.to_owned(),
        source,
    };
    let mut reader = csv::Reader::from_reader(open(path)?);

    let mut assigned = 0;
    let mut unknown = 0;
    for row in reader.deserialize() {
        let row: PrimaryPositionRow = row.map_err(csv_error)?;
        match roster.get_mut(PlayerId(row.player_id)) {
            Some(info) => {
                info.primary_position = Some(row.best_fit_role.into_boxed_str());
                assigned += 1;
            }
            None => unknown += 1,
        }
    }

    if unknown > 0 {
        warn!(unknown, "primary positions of players not in roster");
    }
    info!(assigned, "loaded primary positions");
    Ok(assigned)
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawTeam {
    wy_id: u64,
    name: String,
}

/// Loads team names from the provider's `teams.json`.
pub fn load_teams(path: &Path) -> Result<FxHashMap<TeamId, String>, RosterError> {
    let raw: Vec<RawTeam> =
        serde_json::from_reader(open(path)?).map_err(|source| RosterError::Json {
            path: path.to_owned(),
            source,
        })?;
    Ok(raw
        .into_iter()
        .map(|team| (TeamId(team.wy_id), clean_name(&team.name)))
        .collect())
}

/// Name of a team in reports, `Team <id>` if unknown.
pub fn team_display_name(teams: &FxHashMap<TeamId, String>, team: TeamId) -> String {
    match teams.get(&team) {
        Some(name) => name.clone(),
        None => format!("Team {}", team.0),
    }
}

/// Pairs every item with the name of its team and orders them by that name,
/// as displayed.
pub fn sort_by_team_name<T, F>(teams: &FxHashMap<TeamId, String>, items: Vec<T>, team_of: F) -> Vec<(String, T)>
where
    F: Fn(&T) -> TeamId,
{
    let mut named: Vec<(String, T)> = items
        .into_iter()
        .map(|item| (team_display_name(teams, team_of(&item)), item))
        .collect();
    named.sort_by(|(a, _), (b, _)| a.cmp(b));
    named
}

/// Name of a player in reports, `Player <id>` if unknown.
pub fn player_display_name<R: RosterLookup + ?Sized>(roster: &R, player: PlayerId) -> String {
    match roster.player(player) {
        Some(info) => info.name.clone(),
        None => format!("Player {}", player.0),
    }
}
