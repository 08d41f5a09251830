//! Completed and attempted passes of every player, per team.

use ordered_float::OrderedFloat;
use pitchrate::{Event, PlayerId, Tally, TagId, TeamId};
use rustc_hash::FxHashMap;

/// Players with fewer attempts than this share of their team's busiest
/// passer are left out.
pub const MIN_SHARE_OF_TEAM_MAX: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPassing {
    pub player: PlayerId,
    pub passes: Tally,
}

impl PlayerPassing {
    pub fn accuracy(&self) -> f64 {
        self.passes.ratio().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamPassing {
    pub team: TeamId,
    /// Sorted by accuracy, most accurate first.
    pub players: Vec<PlayerPassing>,
}

/// Tallies passes per team and player. Events without player or team are
/// ignored. Teams are returned in ascending id order.
pub fn pass_accuracy_by_team<'e, I>(events: I) -> Vec<TeamPassing>
where
    I: IntoIterator<Item = &'e Event>,
{
    let mut teams: FxHashMap<TeamId, FxHashMap<PlayerId, Tally>> = FxHashMap::default();
    for event in events {
        if &*event.event_name != "Pass" {
            continue;
        }
        let (Some(player), Some(team)) = (event.player, event.team) else {
            continue;
        };
        let tally = teams.entry(team).or_default().entry(player).or_default();
        tally.total += 1;
        if event.has_tag(TagId::ACCURATE) {
            tally.success += 1;
        }
    }

    let mut result: Vec<TeamPassing> = teams
        .into_iter()
        .map(|(team, players)| {
            let max_attempts = players.values().map(|tally| tally.total).max().unwrap_or(0);
            let threshold = MIN_SHARE_OF_TEAM_MAX * max_attempts as f64;
            let mut players: Vec<PlayerPassing> = players
                .into_iter()
                .filter(|(_, passes)| passes.total as f64 >= threshold)
                .map(|(player, passes)| PlayerPassing { player, passes })
                .collect();
            players.sort_by_key(|p| p.player);
            players.sort_by_key(|p| OrderedFloat(-p.accuracy()));
            TeamPassing { team, players }
        })
        .collect();
    result.sort_by_key(|team| team.team);
    result
}

#[cfg(test)]
mod tests {
    use pitchrate::MatchId;

    use super::*;

    fn pass(player: u64, team: u64, accurate: bool) -> Event {
        let event = Event::new(Some(PlayerId(player)), Some(MatchId(1)), "Pass", "Simple pass")
            .with_team(TeamId(team));
        if accurate {
            event.with_tags([TagId::ACCURATE])
        } else {
            event
        }
    }

    #[test]
    fn test_pass_accuracy_by_team() {
        let mut events = Vec::new();
        // Team 1: player 10 with 8/10, player 11 with 3/3, player 12 with 2/2.
        for i in 0..10 {
            events.push(pass(10, 1, i < 8));
        }
        for _ in 0..3 {
            events.push(pass(11, 1, true));
        }
        for _ in 0..2 {
            events.push(pass(12, 1, true));
        }
        // Team 2: single player 20 with 0/1.
        events.push(pass(20, 2, false));
        // Ignored.
        events.push(Event::new(Some(PlayerId(10)), Some(MatchId(1)), "Shot", "Shot").with_team(TeamId(1)));
        events.push(Event::new(Some(PlayerId(30)), Some(MatchId(1)), "Pass", "Simple pass"));

        let teams = pass_accuracy_by_team(&events);
        assert_eq!(teams.len(), 2);

        assert_eq!(teams[0].team, TeamId(1));
        let players: Vec<PlayerId> = teams[0].players.iter().map(|p| p.player).collect();
        // Player 12 is below a quarter of the busiest passer's attempts.
        assert_eq!(players, [PlayerId(11), PlayerId(10)]);
        assert_eq!(teams[0].players[1].passes, Tally::new(8, 10));

        assert_eq!(teams[1].players.len(), 1);
        assert_eq!(teams[1].players[0].accuracy(), 0.0);
    }
}
