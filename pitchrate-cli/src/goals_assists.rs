//! Goal scorers and assist providers of every team.

use std::cmp::Reverse;

use pitchrate::{Event, MatchId, PlayerId, TagId, TeamId};
use rustc_hash::FxHashMap;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PlayerCount {
    pub player: PlayerId,
    pub count: u64,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TeamLeaders {
    pub team: TeamId,
    /// Most goals first.
    pub scorers: Vec<PlayerCount>,
    /// Most assists first.
    pub providers: Vec<PlayerCount>,
}

#[derive(Default)]
struct Counts {
    goals: FxHashMap<PlayerId, u64>,
    assists: FxHashMap<PlayerId, u64>,
}

fn is_goal(event: &Event) -> bool {
    &*event.event_name == "Shot" && event.has_tag(TagId::GOAL)
}

fn is_assist(event: &Event) -> bool {
    &*event.event_name == "Pass" && event.has_tag(TagId::KEY_PASS)
}

fn ranked(counts: FxHashMap<PlayerId, u64>) -> Vec<PlayerCount> {
    let mut ranked: Vec<PlayerCount> = counts
        .into_iter()
        .map(|(player, count)| PlayerCount { player, count })
        .collect();
    ranked.sort_by_key(|p| (Reverse(p.count), p.player));
    ranked
}

/// Counts goals (shots tagged as goal) and assists (passes tagged as key
/// pass) per team and player. Events lacking player, team or match, or
/// carrying a zero id, are ignored. Only teams with at least one goal or
/// assist are returned, in ascending id order.
pub fn goals_and_assists_by_team<'e, I>(events: I) -> Vec<TeamLeaders>
where
    I: IntoIterator<Item = &'e Event>,
{
    let mut teams: FxHashMap<TeamId, Counts> = FxHashMap::default();
    for event in events {
        let (Some(player), Some(team), Some(MatchId(match_id))) = (event.player, event.team, event.match_id)
        else {
            continue;
        };
        if player.0 == 0 || team.0 == 0 || match_id == 0 {
            continue;
        }
        if is_goal(event) {
            *teams.entry(team).or_default().goals.entry(player).or_default() += 1;
        }
        if is_assist(event) {
            *teams.entry(team).or_default().assists.entry(player).or_default() += 1;
        }
    }

    let mut result: Vec<TeamLeaders> = teams
        .into_iter()
        .map(|(team, counts)| TeamLeaders {
            team,
            scorers: ranked(counts.goals),
            providers: ranked(counts.assists),
        })
        .collect();
    result.sort_by_key(|team| team.team);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(player: u64, team: u64, name: &str, tags: &[TagId]) -> Event {
        Event::new(Some(PlayerId(player)), Some(MatchId(1)), name, "")
            .with_team(TeamId(team))
            .with_tags(tags.iter().copied())
    }

    #[test]
    fn test_goals_and_assists_by_team() {
        let events = [
            event(9, 1, "Shot", &[TagId::GOAL, TagId::ACCURATE]),
            event(9, 1, "Shot", &[TagId::GOAL]),
            event(7, 1, "Shot", &[TagId::GOAL]),
            event(7, 1, "Shot", &[TagId::ACCURATE]),
            event(10, 1, "Pass", &[TagId::KEY_PASS, TagId::ACCURATE]),
            // Goal tag on a non-shot, assist tag on a non-pass.
            event(10, 1, "Free Kick", &[TagId::GOAL]),
            event(7, 1, "Others on the ball", &[TagId::KEY_PASS]),
            event(4, 2, "Pass", &[TagId::ASSIST]),
            event(0, 3, "Shot", &[TagId::GOAL]),
        ];

        let teams = goals_and_assists_by_team(&events);
        assert_eq!(
            teams,
            [TeamLeaders {
                team: TeamId(1),
                scorers: vec![
                    PlayerCount { player: PlayerId(9), count: 2 },
                    PlayerCount { player: PlayerId(7), count: 1 },
                ],
                providers: vec![PlayerCount { player: PlayerId(10), count: 1 }],
            }]
        );
    }
}
