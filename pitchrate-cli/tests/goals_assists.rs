use std::fs;

use pitchrate::{PlayerId, TeamId};
use pitchrate_cli::{
    goals_assists::{goals_and_assists_by_team, PlayerCount},
    roster::{load_players, load_teams, player_display_name, sort_by_team_name},
    source::read_shards,
};

const PLAYERS: &str = r#"[
    {"wyId": 25413, "shortName": "A. Lacazette", "role": {"code2": "FW", "code3": "FWD"}},
    {"wyId": 7868, "shortName": "M. Özil", "role": {"code2": "MD", "code3": "MID"}},
    {"wyId": 3319, "shortName": "J. Vardy", "role": {"code2": "FW", "code3": "FWD"}}
]"#;

const TEAMS: &str = r#"[
    {"wyId": 1609, "name": "Arsenal"},
    {"wyId": 1631, "name": "Leicester City"}
]"#;

const EVENTS: &str = r#"[
    {"eventName": "Pass", "subEventName": "Simple pass", "tags": [{"id": 302}, {"id": 1801}],
     "playerId": 7868, "teamId": 1609, "matchId": 2499719},
    {"eventName": "Shot", "subEventName": "Shot", "tags": [{"id": 101}, {"id": 1801}],
     "playerId": 25413, "teamId": 1609, "matchId": 2499719},
    {"eventName": "Shot", "subEventName": "Shot", "tags": [{"id": 101}],
     "playerId": 25413, "teamId": 1609, "matchId": 2499719},
    {"eventName": "Shot", "subEventName": "Shot", "tags": [{"id": 101}],
     "playerId": 3319, "teamId": 1631, "matchId": 2499719},
    {"eventName": "Shot", "subEventName": "Shot", "tags": [{"id": 101}],
     "playerId": 3319, "teamId": 1631, "matchId": 0},
    {"eventName": "Shot", "subEventName": "Shot", "tags": [{"id": 101}],
     "playerId": 99, "teamId": 1700, "matchId": 2499719}
]"#;

#[test]
fn test_goals_and_assists_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events");
    fs::create_dir(&events).unwrap();
    fs::write(events.join("events_England.json"), EVENTS).unwrap();
    fs::write(dir.path().join("players.json"), PLAYERS).unwrap();
    fs::write(dir.path().join("teams.json"), TEAMS).unwrap();

    let roster = load_players(&dir.path().join("players.json")).unwrap();
    let teams = load_teams(&dir.path().join("teams.json")).unwrap();
    let shards = read_shards(&events).unwrap();
    assert_eq!(shards.len(), 1);

    let by_team = sort_by_team_name(&teams, goals_and_assists_by_team(&shards[0].events), |team| team.team);
    let names: Vec<&str> = by_team.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["Arsenal", "Leicester City", "Team 1700"]);

    let (_, arsenal) = &by_team[0];
    assert_eq!(arsenal.team, TeamId(1609));
    assert_eq!(arsenal.scorers, [PlayerCount { player: PlayerId(25413), count: 2 }]);
    assert_eq!(arsenal.providers, [PlayerCount { player: PlayerId(7868), count: 1 }]);
    assert_eq!(player_display_name(&roster, arsenal.providers[0].player), "M. Özil");

    // The goal without a match id is not counted.
    let (_, leicester) = &by_team[1];
    assert_eq!(leicester.scorers, [PlayerCount { player: PlayerId(3319), count: 1 }]);
    assert!(leicester.providers.is_empty());

    let (_, unknown) = &by_team[2];
    assert_eq!(player_display_name(&roster, unknown.scorers[0].player), "Player 99");
}
