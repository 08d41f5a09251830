use std::{fs, io, path::Path, path::PathBuf};

use pitchrate::{NormalizerConfig, RatingConfig, RatingKind, SortKey};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid settings in {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Contents of a `--config` TOML file. Either a complete `[rating]`
/// definition, or a `preset` with selected overrides.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub preset: Option<RatingKind>,
    #[serde(default)]
    pub rating: Option<RatingConfig>,
    #[serde(default)]
    pub min_games: Option<u32>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub sort: Option<SortKey>,
    #[serde(default)]
    pub normalizer: Option<NormalizerConfig>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Settings, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SettingsError::Toml {
            path: path.to_owned(),
            source,
        })
    }

    /// Resolves the rating configuration, falling back to the preset of
    /// `kind` if the settings name neither a preset nor a full rating.
    pub fn into_config(self, kind: RatingKind) -> RatingConfig {
        let mut config = match (self.rating, self.preset) {
            (Some(rating), _) => rating,
            (None, Some(preset)) => RatingConfig::preset(preset),
            (None, None) => RatingConfig::preset(kind),
        };
        if let Some(min_games) = self.min_games {
            config.min_games = min_games;
        }
        if let Some(sort) = self.sort {
            config.sort = sort;
        }
        if let Some(normalizer) = self.normalizer {
            config.normalizer = normalizer;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use pitchrate::{
        CompositeStrategy, EventFilter, Feature, PeerGrouping, Prior, Rescale, Scale, TagId,
    };

    use super::*;

    #[test]
    fn test_preset_overrides() {
        let settings: Settings = toml::from_str(
            r#"
            preset = "long-passing"
            min_games = 10
            sort = "name"

            [normalizer]
            anchor_weight = 0.5
            "#,
        )
        .unwrap();
        let config = settings.into_config(RatingKind::Passing);
        assert_eq!(&*config.name, "long_passing");
        assert_eq!(config.min_games, 10);
        assert_eq!(config.sort, SortKey::NameAscending);
        assert_eq!(config.normalizer.anchor_weight, 0.5);
        assert_eq!(config.normalizer.target_mean, 65.0);
    }

    #[test]
    fn test_custom_rating() {
        let settings: Settings = toml::from_str(
            r#"
            [rating]
            name = "shooting"
            peer_grouping = "role"
            strategy = { type = "standardized", prior_games = 10.0 }

            [[rating.metrics]]
            name = "shot"
            attempt = { type = "event_name", name = "Shot" }
            success = { type = "tag", tag = 1801 }
            per_match = true

            [[rating.metrics]]
            name = "goal"
            attempt = { type = "all", of = [{ type = "event_name", name = "Shot" }, { type = "tag", tag = 101 }] }

            [[rating.components]]
            name = "shot_accuracy"
            weight = 0.7
            feature = { type = "ratio", metric = "shot", prior = { mean = 0.35, weight = 15.0 } }

            [[rating.components]]
            name = "goals_per_game"
            weight = 0.3
            feature = { type = "per_game", metric = "goal" }
            scale = { type = "fixed", denominator = 1.0 }

            [rating.normalizer]
            rescale = "direct"
            "#,
        )
        .unwrap();
        let config = settings.into_config(RatingKind::Passing);
        assert_eq!(&*config.name, "shooting");
        assert_eq!(config.peer_grouping, PeerGrouping::Role);
        assert_eq!(config.strategy, CompositeStrategy::Standardized { prior_games: 10.0 });
        assert_eq!(config.appearance, EventFilter::Any);
        assert_eq!(
            config.metrics[1].attempt,
            EventFilter::all([EventFilter::event("Shot"), EventFilter::tag(TagId::GOAL)])
        );
        assert_eq!(config.components[0].feature, Feature::ratio("shot", Prior::new(0.35, 15.0)));
        assert_eq!(config.components[1].scale, Scale::Fixed { denominator: 1.0 });
        assert_eq!(config.normalizer.rescale, Rescale::Direct);
        assert_eq!(config.min_games, 1);
    }

    #[test]
    fn test_component_weight_is_required() {
        let result: Result<Settings, _> = toml::from_str(
            r#"
            [rating]
            name = "shooting"

            [[rating.metrics]]
            name = "shot"
            attempt = { type = "event_name", name = "Shot" }

            [[rating.components]]
            name = "shots_per_game"
            feature = { type = "per_game", metric = "shot" }
            "#,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("weight"), "{err}");
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "preset = \"pace\"\n").unwrap();
        let config = Settings::load(&path).unwrap().into_config(RatingKind::Passing);
        assert_eq!(&*config.name, "pace");

        fs::write(&path, "preset = \"dribbling\"\n").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Toml { .. })));

        fs::write(&path, "colour = \"blue\"\n").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Toml { .. })));
    }
}
