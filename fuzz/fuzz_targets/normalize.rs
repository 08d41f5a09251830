#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pitchrate::{estimate, PeerGroup, PeerNormalizer, RawScore, Rescale, Tally};

#[derive(Arbitrary, Debug)]
struct Player {
    raw: f64,
    games: u8,
    group: u8,
    success: u16,
    extra: u16,
}

#[derive(Arbitrary, Debug)]
struct Input {
    anchor_weight: u8,
    shrinkage: u8,
    direct: bool,
    players: Vec<Player>,
}

fuzz_target!(|input: Input| {
    let normalizer = PeerNormalizer::builder()
        .anchor_weight(f64::from(input.anchor_weight) / 255.0)
        .shrinkage(f64::from(input.shrinkage))
        .rescale(if input.direct { Rescale::Direct } else { Rescale::PeerZScore })
        .build();

    let groups: Vec<PeerGroup> = (0..4).map(|g| PeerGroup(format!("G{g}").into())).collect();
    let scores: Vec<RawScore<'_>> = input
        .players
        .iter()
        .map(|player| RawScore {
            peer_group: &groups[usize::from(player.group % 4)],
            raw: player.raw,
            games: u32::from(player.games),
        })
        .collect();

    for rating in normalizer.normalize(&scores) {
        assert!(rating.is_valid(), "{rating:?}");
    }

    let tallies = input.players.iter().map(|player| {
        let success = u64::from(player.success);
        Tally::new(success, success + u64::from(player.extra))
    });
    let consistency = estimate::consistency(tallies);
    assert!((0.0..=1.0).contains(&consistency));

    for player in &input.players {
        let success = u64::from(player.success);
        let smoothed = estimate::smooth(success, success + u64::from(player.extra), 0.5, 10.0);
        assert!((0.0..=1.0).contains(&smoothed));
    }
});
