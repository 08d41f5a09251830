//! Built-in configurations of the supported rating families.

use crate::{
    ComponentSpec, CompositeStrategy, EventFilter, Feature, GamesTerm, MetricDefinition,
    NormalizerConfig, PeerGrouping, Prior, RatingConfig, RatingKind, Rescale, Scale, SortKey,
    TagId, Yards,
};

const LONG_PASS: Yards = Yards(25.0);
const LONG_CARRY: Yards = Yards(20.0);

const CROSS_KINDS: [(&str, &str); 4] = [
    ("Pass", "Cross"),
    ("Pass", "High pass"),
    ("Pass", "Launch"),
    ("Free Kick", "Free kick cross"),
];

const DUEL_KINDS: [&str; 4] = [
    "Air duel",
    "Ground attacking duel",
    "Ground defending duel",
    "Ground loose ball duel",
];

impl RatingConfig {
    pub fn preset(kind: RatingKind) -> RatingConfig {
        match kind {
            RatingKind::Passing => passing(),
            RatingKind::Crossing => crossing(),
            RatingKind::LongPassing => long_passing(),
            RatingKind::Tackling => tackling(),
            RatingKind::Creativity => creativity(),
            RatingKind::Pace => pace(),
        }
    }
}

fn accurate() -> EventFilter {
    EventFilter::tag(TagId::ACCURATE)
}

fn with_tag(filter: EventFilter, tag: TagId) -> EventFilter {
    EventFilter::all([filter, EventFilter::tag(tag)])
}

fn passing() -> RatingConfig {
    let pass = || EventFilter::event("Pass");
    let prior = Prior::new(0.75, 30.0);

    RatingConfig {
        name: "passing".into(),
        metrics: vec![
            MetricDefinition::ratio("pass", pass(), accurate()).per_match(),
            MetricDefinition::ratio("smart_pass", with_tag(pass(), TagId::THROUGH), accurate()),
            MetricDefinition::ratio("free_kick_pass", with_tag(pass(), TagId::FREE_KICK), accurate()),
            // Assists are credited through the key-pass tag.
            MetricDefinition::count("assist", with_tag(pass(), TagId::KEY_PASS)),
        ],
        appearance: pass(),
        components: vec![
            ComponentSpec::new("pass_accuracy", Feature::ratio("pass", prior), 0.45),
            ComponentSpec::new("passes_per_game", Feature::per_game("pass"), 0.2)
                .scaled(Scale::PopulationMax),
            ComponentSpec::new("smart_pass_accuracy", Feature::ratio("smart_pass", Prior::new(0.55, 15.0)), 0.06),
            ComponentSpec::new("free_kick_accuracy", Feature::ratio("free_kick_pass", Prior::new(0.7, 10.0)), 0.04),
            ComponentSpec::new("assists_per_game", Feature::per_game("assist"), 0.1).scaled(Scale::PeerMax),
            ComponentSpec::new("consistency", Feature::consistency("pass"), 0.23),
            ComponentSpec::new("turnover_rate", Feature::turnover("pass", prior), -0.05),
        ],
        strategy: CompositeStrategy::WeightedSum,
        games_term: Some(GamesTerm {
            min_games: 5,
            penalty: -0.25,
            full_effect_games: 30,
            max_bonus: 0.3,
            weight: 0.3,
        }),
        peer_grouping: PeerGrouping::Role,
        normalizer: NormalizerConfig {
            anchor_weight: 0.2,
            shrinkage: 20.0,
            ..NormalizerConfig::default()
        },
        min_games: 1,
        required_metric: None,
        sort: SortKey::ScoreDescending,
    }
}

fn crossing() -> RatingConfig {
    let cross = || EventFilter::kinds(&CROSS_KINDS);
    let prior = Prior::new(0.4, 20.0);

    RatingConfig {
        name: "crossing".into(),
        metrics: vec![
            MetricDefinition::ratio("cross", cross(), accurate()).per_match(),
            MetricDefinition::count("cross_key_pass", with_tag(cross(), TagId::KEY_PASS)),
        ],
        appearance: cross(),
        components: vec![
            ComponentSpec::new("cross_accuracy", Feature::ratio("cross", prior), 0.55),
            ComponentSpec::new("crosses_per_game", Feature::per_game("cross"), 0.25)
                .scaled(Scale::Fixed { denominator: 5.0 }),
            ComponentSpec::new("key_passes_per_game", Feature::per_game("cross_key_pass"), 0.3)
                .scaled(Scale::Fixed { denominator: 2.0 }),
            ComponentSpec::new("consistency", Feature::consistency("cross"), 0.1),
            ComponentSpec::new("turnover_rate", Feature::turnover("cross", prior), -0.05),
        ],
        strategy: CompositeStrategy::WeightedSum,
        games_term: Some(GamesTerm {
            min_games: 5,
            penalty: -0.2,
            full_effect_games: 30,
            max_bonus: 0.25,
            weight: 1.0,
        }),
        peer_grouping: PeerGrouping::Role,
        normalizer: NormalizerConfig {
            anchor_weight: 0.2,
            shrinkage: 20.0,
            ..NormalizerConfig::default()
        },
        min_games: 1,
        required_metric: Some("cross".into()),
        sort: SortKey::ScoreDescending,
    }
}

fn long_passing() -> RatingConfig {
    let long = || EventFilter::all([EventFilter::event("Pass"), EventFilter::min_travel(LONG_PASS)]);
    let prior = Prior::new(0.6, 20.0);

    RatingConfig {
        name: "long_passing".into(),
        metrics: vec![
            MetricDefinition::ratio("long_pass", long(), accurate()).per_match(),
            MetricDefinition::ratio("long_through_pass", with_tag(long(), TagId::THROUGH), accurate()),
            MetricDefinition::count("long_pass_assist", with_tag(long(), TagId::KEY_PASS)),
            MetricDefinition::ratio(
                "free_kick_pass",
                with_tag(EventFilter::event("Pass"), TagId::FREE_KICK),
                accurate(),
            ),
        ],
        appearance: EventFilter::all([EventFilter::event("Pass"), EventFilter::HasTravel]),
        components: vec![
            ComponentSpec::new("long_pass_accuracy", Feature::ratio("long_pass", prior), 0.6),
            ComponentSpec::new(
                "long_through_pass_accuracy",
                Feature::ratio("long_through_pass", Prior::new(0.5, 10.0)),
                0.35,
            ),
            ComponentSpec::new("long_pass_assists_per_game", Feature::per_game("long_pass_assist"), 0.2),
            ComponentSpec::new("free_kick_accuracy", Feature::ratio("free_kick_pass", Prior::new(0.7, 10.0)), 0.05),
            ComponentSpec::new("consistency", Feature::consistency("long_pass"), 0.15),
            ComponentSpec::new("turnover_rate", Feature::turnover("long_pass", prior), -0.03),
        ],
        strategy: CompositeStrategy::WeightedSum,
        games_term: Some(GamesTerm {
            min_games: 5,
            penalty: -0.2,
            full_effect_games: 30,
            max_bonus: 0.25,
            weight: 0.3,
        }),
        peer_grouping: PeerGrouping::PrimaryPosition,
        normalizer: NormalizerConfig {
            anchor_weight: 0.2,
            shrinkage: 20.0,
            ..NormalizerConfig::default()
        },
        min_games: 1,
        required_metric: Some("long_pass".into()),
        sort: SortKey::ScoreDescending,
    }
}

fn tackling() -> RatingConfig {
    let prior = Prior::new(0.5, 10.0);

    RatingConfig {
        name: "tackling".into(),
        metrics: vec![
            MetricDefinition::ratio("ground_duel", EventFilter::kind("Duel", "Ground defending duel"), accurate())
                .per_match(),
            MetricDefinition::ratio("aerial_duel", EventFilter::kind("Duel", "Air duel"), accurate()),
            MetricDefinition::count("clearance", EventFilter::sub_event("Clearance")),
            MetricDefinition::count("foul", EventFilter::event("Foul")),
        ],
        appearance: EventFilter::Any,
        components: vec![
            ComponentSpec::new("ground_duel_accuracy", Feature::ratio("ground_duel", prior), 0.6),
            ComponentSpec::new("ground_duels_per_game", Feature::per_game("ground_duel"), 0.25)
                .scaled(Scale::Fixed { denominator: 10.0 }),
            ComponentSpec::new("aerial_duel_accuracy", Feature::ratio("aerial_duel", prior), 0.3),
            ComponentSpec::new("clearances_per_game", Feature::per_game("clearance"), 0.075)
                .scaled(Scale::Capped { cap: 6.0, denominator: 5.0 }),
            ComponentSpec::new("consistency", Feature::consistency("ground_duel"), 0.25),
            ComponentSpec::new("fouls_per_game", Feature::per_game("foul"), -0.02),
        ],
        strategy: CompositeStrategy::WeightedSum,
        games_term: Some(GamesTerm {
            min_games: 5,
            penalty: -0.2,
            full_effect_games: 50,
            max_bonus: 0.7,
            weight: 1.0,
        }),
        peer_grouping: PeerGrouping::Global,
        normalizer: NormalizerConfig {
            shrinkage: 15.0,
            ..NormalizerConfig::default()
        },
        min_games: 1,
        required_metric: None,
        sort: SortKey::ScoreDescending,
    }
}

fn creativity() -> RatingConfig {
    let prior = Prior::new(0.4, 20.0);
    let ratio = |name: &str, attempt: EventFilter| {
        MetricDefinition::ratio(name, attempt, accurate()).per_match()
    };
    let count = |name: &str, attempt: EventFilter| MetricDefinition::count(name, attempt).per_match();

    let metrics = vec![
        ratio("acceleration", EventFilter::kind("Others on the ball", "Acceleration")),
        ratio("launch", EventFilter::kind("Pass", "Launch")),
        ratio("smart_pass", EventFilter::kind("Pass", "Smart pass")),
        ratio("through_ball", EventFilter::tag(TagId::THROUGH)),
        count("shot", EventFilter::event("Shot")),
        count("goal", with_tag(EventFilter::event("Shot"), TagId::GOAL)),
        count("assist", EventFilter::tag(TagId::ASSIST)),
        count("key_pass", EventFilter::tag(TagId::KEY_PASS)),
        count("counter_attack", EventFilter::tag(TagId::COUNTER_ATTACK)),
        count("opportunity", EventFilter::tag(TagId::OPPORTUNITY)),
        count("feint", EventFilter::tag(TagId::FEINT)),
        count("anticipated", EventFilter::tag(TagId::ANTICIPATED)),
        count("duel", EventFilter::any_of(DUEL_KINDS.map(EventFilter::sub_event))),
    ];
    let activity: Vec<&str> = metrics.iter().map(|metric| &*metric.name).collect();
    let activity = Feature::activity_consistency(&activity);

    RatingConfig {
        name: "creativity".into(),
        components: vec![
            ComponentSpec::new("accelerations_per_game", Feature::per_game("acceleration"), 0.04),
            ComponentSpec::new("acceleration_accuracy", Feature::ratio("acceleration", prior), 0.04),
            ComponentSpec::new("launches_per_game", Feature::per_game("launch"), 0.02),
            ComponentSpec::new("launch_accuracy", Feature::ratio("launch", prior), 0.02),
            ComponentSpec::new("smart_passes_per_game", Feature::per_game("smart_pass"), 0.10),
            ComponentSpec::new("smart_pass_accuracy", Feature::ratio("smart_pass", prior), 0.08),
            ComponentSpec::new("through_balls_per_game", Feature::per_game("through_ball"), 0.08),
            ComponentSpec::new("through_ball_accuracy", Feature::ratio("through_ball", prior), 0.07),
            ComponentSpec::new("shots_per_game", Feature::per_game("shot"), 0.08),
            ComponentSpec::new("goals_per_game", Feature::per_game("goal"), 0.10),
            ComponentSpec::new("assists_per_game", Feature::per_game("assist"), 0.11),
            ComponentSpec::new("key_passes_per_game", Feature::per_game("key_pass"), 0.09),
            ComponentSpec::new("counter_attacks_per_game", Feature::per_game("counter_attack"), 0.05),
            ComponentSpec::new("opportunities_per_game", Feature::per_game("opportunity"), 0.05),
            ComponentSpec::new("feints_per_game", Feature::per_game("feint"), 0.07),
            ComponentSpec::new("anticipation_rate", Feature::rate("anticipated", "duel"), -0.06),
            ComponentSpec::new("activity_consistency", activity, 0.02),
        ],
        metrics,
        appearance: EventFilter::Any,
        strategy: CompositeStrategy::Standardized { prior_games: 15.0 },
        games_term: None,
        peer_grouping: PeerGrouping::PrimaryPosition,
        normalizer: NormalizerConfig {
            rescale: Rescale::Direct,
            ..NormalizerConfig::default()
        },
        min_games: 3,
        required_metric: None,
        sort: SortKey::ScoreDescending,
    }
}

fn pace() -> RatingConfig {
    let measured = |filter: EventFilter| EventFilter::all([filter, EventFilter::HasTravel]);
    let touch = || EventFilter::kind("Others on the ball", "Touch");

    RatingConfig {
        name: "pace".into(),
        metrics: vec![
            MetricDefinition::count(
                "acceleration",
                measured(EventFilter::kind("Others on the ball", "Acceleration")),
            ),
            MetricDefinition::count("carry", measured(touch())),
            MetricDefinition::count(
                "long_carry",
                EventFilter::all([touch(), EventFilter::min_travel(LONG_CARRY)]),
            ),
            MetricDefinition::count(
                "attacking_duel",
                measured(EventFilter::kind("Duel", "Ground attacking duel")),
            ),
            MetricDefinition::count("wide_run", EventFilter::all([touch(), EventFilter::HasTravel, EventFilter::WideStart])),
            MetricDefinition::count("counter_attack", measured(EventFilter::tag(TagId::COUNTER_ATTACK))),
        ],
        appearance: EventFilter::Any,
        components: vec![
            ComponentSpec::new("accelerations_per_game", Feature::per_game("acceleration"), 0.65),
            ComponentSpec::new("long_carries_per_game", Feature::per_game("long_carry"), 0.39),
            ComponentSpec::new("attacking_duels_per_game", Feature::per_game("attacking_duel"), 0.26),
            ComponentSpec::new("wide_runs_per_game", Feature::per_game("wide_run"), 0.13),
            ComponentSpec::new("carry_distance", Feature::mean_travel("carry"), 0.26)
                .scaled(Scale::Fixed { denominator: 20.0 }),
            ComponentSpec::new("counter_attacks_per_game", Feature::per_game("counter_attack"), 0.13),
        ],
        strategy: CompositeStrategy::WeightedSum,
        games_term: None,
        peer_grouping: PeerGrouping::Role,
        normalizer: NormalizerConfig {
            anchor_weight: 0.2,
            shrinkage: 10.0,
            ..NormalizerConfig::default()
        },
        min_games: 1,
        required_metric: None,
        sort: SortKey::ScoreDescending,
    }
}
