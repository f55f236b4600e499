//! Scoring tests - base, bonus and behavior points

use gem_cascade::core::{
    find_matches, EngineConfig, GameBoard, NoopSink, Playfield, ScoreEngine, ScoreRules,
    SimpleRng, TileBehavior,
};
use gem_cascade::types::{Coord, ScoreChange};

const EVEN: &str = "ABCDABCDA";
const ODD: &str = "CDABCDABC";

fn rules(bonus: i64) -> ScoreRules {
    ScoreRules {
        minimum_match_count: 3,
        base_points_per_tile: 2,
        bonus_per_additional_tile: bonus,
    }
}

#[test]
fn test_point_formula() {
    let rules = ScoreRules::default();
    assert_eq!(rules.base_points(3, 0), 6);
    assert_eq!(rules.base_points(4, 0), 8);
    assert_eq!(rules.base_points(3, 2), 18);
    assert_eq!(rules.bonus_points(3), 0);
    assert_eq!(rules.bonus_points(5), 2);
}

#[test]
fn test_cascade_level_multiplies_base_only() {
    let pf = Playfield::from_layout(&["AAAA", "BCDB", "CDBC", "DBCD"], 6).unwrap();
    let matched = &find_matches(&pf, 3, 0)[0];

    for level in 0..4 {
        let mut scoring = ScoreEngine::new(ScoreRules::default());
        let scored = scoring.increase_score(&pf, matched, level);
        assert_eq!(scored.delta.base, 4 * 2 * (level as i64 + 1));
        assert_eq!(scored.delta.bonus, 1);
        assert_eq!(scored.delta.behavior, 0);
        assert_eq!(scored.delta.round, level);
    }
}

#[test]
fn test_swap_into_four_in_a_row() {
    let rows = [
        EVEN, ODD, EVEN, ODD, "EEAEABCDA", "CDEBCDABC", EVEN, ODD, EVEN,
    ];
    let config = EngineConfig::default();
    let mut board =
        GameBoard::with_layout_and_parts(config, &rows, SimpleRng::new(9), NoopSink).unwrap();
    assert!(board.current_matches().is_empty());

    let outcome = board.try_swap(Coord::new(4, 2), Coord::new(5, 2)).unwrap();
    assert!(outcome.accepted);
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].len(), 4);

    let events = board.take_score_events();
    let first = events[0];
    assert_eq!(first.round, 0);
    assert_eq!(first.base, 8);
    assert_eq!(first.bonus, 1);
    assert_eq!(first.change, 9);
    assert_eq!(first.new_total, 9);
    assert_eq!(first.direction, ScoreChange::Increase);

    assert_eq!(events.iter().map(|d| d.change).sum::<i64>(), board.score());
    assert!(board.take_score_events().is_empty());
}

#[test]
fn test_double_points_tile_triples_the_match() {
    let rows = [
        "AAAAABCDA", ODD, EVEN, ODD, EVEN, ODD, EVEN, ODD, EVEN,
    ];
    let mut pf = Playfield::from_layout(&rows, 6).unwrap();
    pf.set_behavior(Coord::new(0, 2), TileBehavior::DoublePoints);

    let matched = &find_matches(&pf, 3, 0)[0];
    assert_eq!(matched.len(), 5);

    let mut scoring = ScoreEngine::new(rules(0));
    let scored = scoring.increase_score(&pf, matched, 0);

    assert_eq!(scored.delta.base + scored.delta.bonus, 10);
    assert_eq!(scored.delta.behavior, 20);
    assert_eq!(scored.delta.change, 30);
    assert_eq!(scoring.total(), 30);
    assert_eq!(scored.triggers.len(), 1);
    assert_eq!(scored.triggers[0].behavior, TileBehavior::DoublePoints);
    assert_eq!(scored.triggers[0].score_delta, 20);
    assert!(scored.effects.is_empty());
}

#[test]
fn test_two_double_points_tiles_both_fire() {
    let mut pf = Playfield::from_layout(&["AAAD", "BCDB", "CDBC", "DBCD"], 6).unwrap();
    pf.set_behavior(Coord::new(0, 0), TileBehavior::DoublePoints);
    pf.set_behavior(Coord::new(0, 1), TileBehavior::DoublePoints);

    let matched = &find_matches(&pf, 3, 0)[0];
    let mut scoring = ScoreEngine::new(ScoreRules::default());
    let scored = scoring.increase_score(&pf, matched, 0);

    // 6 points before behaviors, each tile adds double that
    assert_eq!(scored.delta.behavior, 24);
    assert_eq!(scored.delta.change, 30);
    assert_eq!(scored.triggers.len(), 2);
}

#[test]
fn test_totals_accumulate_and_reset() {
    let pf = Playfield::from_layout(&["AAAD", "BCDB", "CDBC", "DBCD"], 6).unwrap();
    let matched = &find_matches(&pf, 3, 0)[0];
    let mut scoring = ScoreEngine::new(ScoreRules::default());

    scoring.increase_score(&pf, matched, 0);
    let second = scoring.increase_score(&pf, matched, 1);
    assert_eq!(second.delta.new_total, 6 + 12);
    assert_eq!(scoring.total(), 18);
    assert_eq!(scoring.last().map(|d| d.change), Some(12));

    scoring.reset();
    assert_eq!(scoring.total(), 0);
    assert!(scoring.last().is_none());
}
