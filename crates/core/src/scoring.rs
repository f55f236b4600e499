//! Scoring - turns a match into points
//!
//! For a match of `k` tiles at cascade level `L`:
//!
//! - `base = k * base_points_per_tile * (L + 1)`
//! - `bonus = (k - minimum_match_count) * bonus_per_additional_tile`
//! - `behavior = sum of each tile's trigger delta`, in match order, where every trigger
//!   sees `base + bonus` as the points before behaviors. A tile shared by crossing
//!   matches belongs to both, so its behavior fires once per match.
//!
//! Integer arithmetic throughout. The total only goes down if a behavior says so.

use serde::{Deserialize, Serialize};

use crate::behavior::{BoardEffect, TileBehavior};
use crate::config::EngineConfig;
use crate::grid::GemGrid;
use crate::matcher::{Centroid, MatchDetails};
use crate::types::{GemKind, ScoreChange, TileSlotId};

/// Point constants, fixed per board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRules {
    pub minimum_match_count: usize,
    pub base_points_per_tile: i64,
    pub bonus_per_additional_tile: i64,
}

impl ScoreRules {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            minimum_match_count: config.minimum_match_count,
            base_points_per_tile: config.base_points_per_tile,
            bonus_per_additional_tile: config.bonus_per_additional_tile,
        }
    }

    pub fn base_points(&self, tiles: usize, level: u32) -> i64 {
        tiles as i64 * self.base_points_per_tile * (level as i64 + 1)
    }

    pub fn bonus_points(&self, tiles: usize) -> i64 {
        tiles.saturating_sub(self.minimum_match_count) as i64 * self.bonus_per_additional_tile
    }
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Breakdown of one match's points, for on-screen feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub base: i64,
    pub bonus: i64,
    pub behavior: i64,
    /// `base + bonus + behavior`
    pub change: i64,
    pub new_total: i64,
    pub direction: ScoreChange,
    pub round: u32,
    pub gem: GemKind,
    pub centroid: Centroid,
}

/// A special tile that fired while scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorTrigger {
    pub slot: TileSlotId,
    pub behavior: TileBehavior,
    pub score_delta: i64,
    pub effects: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    pub delta: ScoreDelta,
    pub triggers: Vec<BehaviorTrigger>,
    pub effects: Vec<BoardEffect>,
}

/// Saved total, restored when a turn is abandoned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCheckpoint {
    total: i64,
    last: Option<ScoreDelta>,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    rules: ScoreRules,
    total: i64,
    last: Option<ScoreDelta>,
}

impl ScoreEngine {
    pub fn new(rules: ScoreRules) -> Self {
        Self {
            rules,
            total: 0,
            last: None,
        }
    }

    pub fn rules(&self) -> &ScoreRules {
        &self.rules
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    /// Breakdown of the most recent match
    pub fn last(&self) -> Option<&ScoreDelta> {
        self.last.as_ref()
    }

    pub fn reset(&mut self) {
        self.total = 0;
        self.last = None;
    }

    pub fn checkpoint(&self) -> ScoreCheckpoint {
        ScoreCheckpoint {
            total: self.total,
            last: self.last,
        }
    }

    /// Drop everything scored since `checkpoint`
    pub fn restore(&mut self, checkpoint: ScoreCheckpoint) {
        self.total = checkpoint.total;
        self.last = checkpoint.last;
    }

    /// Score `matched` at cascade `level`, triggering each tile's behavior once.
    pub fn increase_score<G: GemGrid + ?Sized>(
        &mut self,
        grid: &G,
        matched: &MatchDetails,
        level: u32,
    ) -> ScoredMatch {
        let tiles = matched.len();
        let base = self.rules.base_points(tiles, level);
        let bonus = self.rules.bonus_points(tiles);
        let points_before_behavior = base + bonus;

        let mut behavior = 0;
        let mut triggers = Vec::new();
        let mut effects = Vec::new();
        for tile in &matched.tiles {
            let kind = grid.behavior_of(tile.slot);
            let result = kind.trigger(grid, matched, points_before_behavior);
            behavior += result.score_delta;
            if kind.is_special() {
                triggers.push(BehaviorTrigger {
                    slot: tile.slot,
                    behavior: kind,
                    score_delta: result.score_delta,
                    effects: result.effects.len(),
                });
            }
            effects.extend(result.effects);
        }

        let change = points_before_behavior + behavior;
        self.total += change;

        let delta = ScoreDelta {
            base,
            bonus,
            behavior,
            change,
            new_total: self.total,
            direction: if change < 0 {
                ScoreChange::Decrease
            } else {
                ScoreChange::Increase
            },
            round: matched.round,
            gem: matched.gem(),
            centroid: matched.centroid,
        };
        self.last = Some(delta);

        ScoredMatch {
            delta,
            triggers,
            effects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::EliminationAxis;
    use crate::matcher::find_matches;
    use crate::playfield::Playfield;
    use crate::types::Coord;

    fn field(rows: &[&str]) -> Playfield {
        Playfield::from_layout(rows, 6).unwrap()
    }

    #[test]
    fn test_three_match_first_round() {
        let pf = field(&["AAAB", "BCDC", "CDCD", "DCDC"]);
        let m = &find_matches(&pf, 3, 0)[0];
        let mut engine = ScoreEngine::default();
        let scored = engine.increase_score(&pf, m, 0);

        assert_eq!(scored.delta.base, 6);
        assert_eq!(scored.delta.bonus, 0);
        assert_eq!(scored.delta.behavior, 0);
        assert_eq!(scored.delta.new_total, 6);
        assert_eq!(scored.delta.direction, ScoreChange::Increase);
        assert!(scored.triggers.is_empty());
    }

    #[test]
    fn test_four_match_bonus() {
        let pf = field(&["AAAAB", "BCDCD", "CDCDC", "DCDCD", "CDCDC"]);
        let m = &find_matches(&pf, 3, 0)[0];
        let mut engine = ScoreEngine::default();
        let delta = engine.increase_score(&pf, m, 0).delta;
        assert_eq!(delta.base, 8);
        assert_eq!(delta.bonus, 1);
        assert_eq!(delta.change, 9);
    }

    #[test]
    fn test_level_scales_base_only() {
        let pf = field(&["AAAAB", "BCDCD", "CDCDC", "DCDCD", "CDCDC"]);
        let m = &find_matches(&pf, 3, 0)[0];
        let mut engine = ScoreEngine::default();
        let delta = engine.increase_score(&pf, m, 2).delta;
        assert_eq!(delta.base, 4 * 2 * 3);
        assert_eq!(delta.bonus, 1);
        assert_eq!(engine.total(), 25);
    }

    #[test]
    fn test_double_points_tile() {
        let mut pf = field(&["AAAAAB", "BCDCDC", "CDCDCD", "DCDCDC", "CDCDCD", "DCDCDC"]);
        pf.set_behavior(Coord::new(0, 2), TileBehavior::DoublePoints);
        let m = &find_matches(&pf, 3, 0)[0];

        // Five tiles: base 10 + bonus 2 = 12 before behaviors
        let rules = ScoreRules {
            minimum_match_count: 3,
            base_points_per_tile: 2,
            bonus_per_additional_tile: 1,
        };
        let mut engine = ScoreEngine::new(rules);
        let scored = engine.increase_score(&pf, m, 0);
        assert_eq!(scored.delta.behavior, 24);
        assert_eq!(scored.delta.change, 36);
        assert_eq!(scored.triggers.len(), 1);
        assert_eq!(scored.triggers[0].behavior, TileBehavior::DoublePoints);
    }

    #[test]
    fn test_ten_points_doubled_to_thirty() {
        let mut pf = field(&["AAAAAB", "BCDCDC", "CDCDCD", "DCDCDC", "CDCDCD", "DCDCDC"]);
        pf.set_behavior(Coord::new(0, 4), TileBehavior::DoublePoints);
        let m = &find_matches(&pf, 3, 0)[0];

        let rules = ScoreRules {
            minimum_match_count: 3,
            base_points_per_tile: 2,
            bonus_per_additional_tile: 0,
        };
        let mut engine = ScoreEngine::new(rules);
        let delta = engine.increase_score(&pf, m, 0).delta;
        assert_eq!(delta.base + delta.bonus, 10);
        assert_eq!(delta.behavior, 20);
        assert_eq!(delta.change, 30);
        assert_eq!(engine.last().map(|d| d.new_total), Some(30));
    }

    #[test]
    fn test_elimination_effects_are_collected() {
        let mut pf = field(&["BCAAA", "CDCDC", "DCDCD", "CDCDC", "DCDCD"]);
        pf.set_behavior(
            Coord::new(0, 3),
            TileBehavior::RowColumnElimination(EliminationAxis::FollowMatch),
        );
        let m = &find_matches(&pf, 3, 0)[0];
        let mut engine = ScoreEngine::default();
        let scored = engine.increase_score(&pf, m, 0);
        assert_eq!(scored.delta.behavior, 0);
        assert_eq!(scored.effects.len(), 2);
        assert_eq!(scored.triggers[0].effects, 2);
    }

    #[test]
    fn test_shared_corner_doubles_each_crossing_match() {
        let mut pf = field(&["AAABC", "ABCDB", "ACDBC", "BDBCD", "CBCDB"]);
        pf.set_behavior(Coord::new(0, 0), TileBehavior::DoublePoints);
        let matches = find_matches(&pf, 3, 0);
        assert_eq!(matches.len(), 2);

        let mut engine = ScoreEngine::default();
        for m in &matches {
            let scored = engine.increase_score(&pf, m, 0);
            // 6 points before behaviors, doubled on top
            assert_eq!(scored.delta.behavior, 12);
            assert_eq!(scored.delta.change, 18);
            assert_eq!(scored.triggers.len(), 1);
        }
        assert_eq!(engine.total(), 36);
    }

    #[test]
    fn test_restore_drops_points_since_checkpoint() {
        let pf = field(&["AAAB", "BCDC", "CDCD", "DCDC"]);
        let m = &find_matches(&pf, 3, 0)[0];
        let mut engine = ScoreEngine::default();
        engine.increase_score(&pf, m, 0);
        let checkpoint = engine.checkpoint();
        let kept = engine.last().copied();

        engine.increase_score(&pf, m, 1);
        assert_eq!(engine.total(), 18);

        engine.restore(checkpoint);
        assert_eq!(engine.total(), 6);
        assert_eq!(engine.last().copied(), kept);
    }
}
