use std::{
    fs::{self, File},
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use pitchrate::{Event, MatchId, PlayerId, Point, TagId, TeamId};
use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid event data in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("no events_*.json files in {0:?}")]
    NoEventFiles(PathBuf),
}

/// An event as found in the provider's per-competition JSON files.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default)]
    pub player_id: Option<u64>,
    #[serde(default)]
    pub match_id: Option<u64>,
    #[serde(default)]
    pub team_id: Option<u64>,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub sub_event_name: String,
    #[serde(default)]
    pub tags: Vec<RawTag>,
    #[serde(default)]
    pub positions: Vec<Point>,
}

#[derive(Deserialize, Debug)]
pub struct RawTag {
    pub id: TagId,
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Event {
        let event = Event::new(
            raw.player_id.map(PlayerId),
            raw.match_id.map(MatchId),
            &raw.event_name,
            &raw.sub_event_name,
        )
        .with_tags(raw.tags.into_iter().map(|tag| tag.id))
        .with_positions(raw.positions);
        match raw.team_id {
            Some(team) => event.with_team(TeamId(team)),
            None => event,
        }
    }
}

/// Events of one competition file.
#[derive(Debug, Clone)]
pub struct Shard {
    pub competition: String,
    pub events: Vec<Event>,
}

impl AsRef<[Event]> for Shard {
    fn as_ref(&self) -> &[Event] {
        &self.events
    }
}

/// Files named `events_<competition>.json` in `dir`, sorted by name.
pub fn event_files(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let io_error = |source| SourceError::Io {
        path: dir.to_owned(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if competition_name(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn competition_name(path: &Path) -> Option<&str> {
    path.file_name()?
        .to_str()?
        .strip_prefix("events_")?
        .strip_suffix(".json")
}

pub fn read_events(path: &Path) -> Result<Vec<Event>, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_owned(),
        source,
    })?;
    let raw: Vec<RawEvent> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| SourceError::Json {
            path: path.to_owned(),
            source,
        })?;
    Ok(raw.into_iter().map(Event::from).collect())
}

/// Reads every competition file of `dir` in parallel. Any unreadable file
/// fails the whole source.
pub fn read_shards(dir: &Path) -> Result<Vec<Shard>, SourceError> {
    let files = event_files(dir)?;
    if files.is_empty() {
        return Err(SourceError::NoEventFiles(dir.to_owned()));
    }

    let shards = files
        .par_iter()
        .map(|path| {
            let events = read_events(path)?;
            let competition = competition_name(path).unwrap_or_default().to_owned();
            debug!(%competition, events = events.len(), "read event file");
            Ok(Shard {
                competition,
                events,
            })
        })
        .collect::<Result<Vec<_>, SourceError>>()?;

    info!(
        files = shards.len(),
        events = shards.iter().map(|shard| shard.events.len()).sum::<usize>(),
        "read events"
    );
    Ok(shards)
}
