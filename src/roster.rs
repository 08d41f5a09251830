use std::{fmt, str::FromStr};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::PlayerId;

/// Broad playing role, as recorded by the data provider.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub enum Role {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    #[default]
    Unknown,
}

#[derive(Debug, Error)]
#[error("invalid role code")]
pub struct InvalidRole;

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "GK" | "GKP" => Role::Goalkeeper,
            "DF" | "DEF" => Role::Defender,
            "MD" | "MID" => Role::Midfielder,
            "FW" | "FWD" => Role::Forward,
            "UNKNOWN" => Role::Unknown,
            _ => return Err(InvalidRole),
        })
    }
}

impl Role {
    /// Parses a provider role code, mapping anything unrecognized to
    /// [`Role::Unknown`].
    pub fn from_code(code: &str) -> Role {
        code.parse().unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Goalkeeper => "GK",
            Role::Defender => "DF",
            Role::Midfielder => "MD",
            Role::Forward => "FW",
            Role::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerInfo {
    pub name: String,
    pub role: Role,
    /// Best fitting tactical position (`cb`, `cam`, `st`, ...), if one was
    /// assigned.
    pub primary_position: Option<Box<str>>,
}

/// Read-only view of the players taking part in a run.
pub trait RosterLookup {
    fn player(&self, id: PlayerId) -> Option<&PlayerInfo>;

    fn contains(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    inner: FxHashMap<PlayerId, PlayerInfo>,
}

impl Roster {
    pub fn new() -> Roster {
        Roster::default()
    }

    pub fn insert(&mut self, id: PlayerId, info: PlayerInfo) {
        self.inner.insert(id, info);
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut PlayerInfo> {
        self.inner.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl RosterLookup for Roster {
    fn player(&self, id: PlayerId) -> Option<&PlayerInfo> {
        self.inner.get(&id)
    }
}

impl FromIterator<(PlayerId, PlayerInfo)> for Roster {
    fn from_iter<I: IntoIterator<Item = (PlayerId, PlayerInfo)>>(iter: I) -> Roster {
        Roster {
            inner: iter.into_iter().collect(),
        }
    }
}

/// Label of a cohort against which raw scores are normalized.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PeerGroup(pub Box<str>);

impl PeerGroup {
    pub fn global() -> PeerGroup {
        PeerGroup("All".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How players are partitioned into peer groups.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerGrouping {
    /// Everybody in one group.
    #[default]
    Global,
    Role,
    PrimaryPosition,
}

impl PeerGrouping {
    pub fn group_of(self, info: &PlayerInfo) -> PeerGroup {
        match self {
            PeerGrouping::Global => PeerGroup::global(),
            PeerGrouping::Role => PeerGroup(info.role.label().into()),
            PeerGrouping::PrimaryPosition => PeerGroup(
                info.primary_position
                    .clone()
                    .unwrap_or_else(|| Role::Unknown.label().into()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes() {
        assert_eq!(Role::from_code("GKP"), Role::Goalkeeper);
        assert_eq!(Role::from_code("df"), Role::Defender);
        assert_eq!(Role::from_code("MID"), Role::Midfielder);
        assert_eq!(Role::from_code("FW"), Role::Forward);
        assert_eq!(Role::from_code("XX"), Role::Unknown);
        assert!("XX".parse::<Role>().is_err());
    }

    #[test]
    fn test_peer_groups() {
        let info = PlayerInfo {
            name: "Kanté".to_owned(),
            role: Role::Midfielder,
            primary_position: Some("cdm".into()),
        };
        assert_eq!(PeerGrouping::Global.group_of(&info), PeerGroup::global());
        assert_eq!(PeerGrouping::Role.group_of(&info).as_str(), "MD");
        assert_eq!(PeerGrouping::PrimaryPosition.group_of(&info).as_str(), "cdm");

        let unknown = PlayerInfo::default();
        assert_eq!(PeerGrouping::Role.group_of(&unknown).as_str(), "Unknown");
        assert_eq!(PeerGrouping::PrimaryPosition.group_of(&unknown).as_str(), "Unknown");
    }
}
