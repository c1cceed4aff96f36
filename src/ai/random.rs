//! 随机 AI 策略

use super::{make_rng, sort_and_truncate, AIStrategy, ScoredMove};
use crate::game::Game;
use rand::prelude::*;
use std::cell::RefCell;

/// 随机 AI - 随机选择合法走法
pub struct RandomAI {
    rng: RefCell<StdRng>,
}

impl RandomAI {
    pub fn new(seed: Option<u64>) -> Self {
        RandomAI {
            rng: RefCell::new(make_rng(seed)),
        }
    }
}

impl AIStrategy for RandomAI {
    fn select_moves(&self, game: &Game, n: usize) -> Vec<ScoredMove> {
        let moves = game.all_legal_moves();
        let mut rng = self.rng.borrow_mut();

        let mut scored: Vec<ScoredMove> = moves
            .into_iter()
            .map(|(from, mv)| ScoredMove {
                from,
                mv,
                score: rng.gen::<f64>(),
            })
            .collect();

        sort_and_truncate(&mut scored, n);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;

    #[test]
    fn test_same_seed_same_choice() {
        let game = Game::from_fen(test_positions::START).unwrap();
        let a = RandomAI::new(Some(11)).select_moves(&game, 7);
        let b = RandomAI::new(Some(11)).select_moves(&game, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_scores_in_unit_range() {
        let game = Game::new();
        for sm in RandomAI::new(None).select_moves(&game, 10) {
            assert!((0.0..1.0).contains(&sm.score));
        }
    }
}
