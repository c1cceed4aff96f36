//! 贪婪 AI 策略

use super::{make_rng, sort_and_truncate, AIConfig, AIStrategy, ScoredMove};
use crate::game::Game;
use crate::types::{Move, Square};
use rand::prelude::*;
use std::cell::RefCell;

const WIN_SCORE: f64 = 10000.0;
const CAPTURE_SCORE: f64 = 100.0;
const PROMOTION_SCORE: f64 = 80.0;
const CHAIN_SCORE: f64 = 60.0;
const HANGING_PENALTY: f64 = 90.0;

/// 贪婪 AI - 优先吃子、升王和安全走法
pub struct GreedyAI {
    rng: RefCell<StdRng>,
    randomness: f64,
}

impl GreedyAI {
    pub fn new(config: &AIConfig) -> Self {
        GreedyAI {
            rng: RefCell::new(make_rng(config.seed)),
            randomness: config.randomness,
        }
    }

    /// 评估单个走法
    fn evaluate_move(&self, game: &Game, from: Square, mv: &Move) -> f64 {
        let mover = game.turn();
        let to = mv.destination();

        let mut after = game.clone();
        let outcome = match after.apply_move(from, to) {
            Ok(outcome) => outcome,
            Err(_) => return f64::MIN,
        };

        if outcome.winner == Some(mover) {
            return WIN_SCORE;
        }

        let mut score = 0.0;

        if mv.is_capture() {
            score += CAPTURE_SCORE;
        }
        if outcome.promoted {
            score += PROMOTION_SCORE;
        }
        if outcome.continuation.is_some() {
            score += CHAIN_SCORE;
        } else if after
            .all_legal_moves()
            .iter()
            .any(|(_, reply)| reply.captured() == Some(to))
        {
            // 落点下一步会被吃
            score -= HANGING_PENALTY;
        }

        // 前进奖励（兵）
        if let Some(piece) = game.board().get_piece(from) {
            if !piece.is_king {
                let progress = (to.row - from.row) * mover.forward();
                score += progress as f64 * 5.0;
            }
        }

        // 位置奖励：控制中心
        let center_bonus = 3.5 - (3.5 - to.col as f64).abs();
        score += center_bonus;

        score
    }
}

impl AIStrategy for GreedyAI {
    fn select_moves(&self, game: &Game, n: usize) -> Vec<ScoredMove> {
        let moves = game.all_legal_moves();
        let mut rng = self.rng.borrow_mut();

        let mut scored: Vec<ScoredMove> = moves
            .into_iter()
            .map(|(from, mv)| {
                let base_score = self.evaluate_move(game, from, &mv);
                let noise = if self.randomness > 0.0 {
                    rng.gen::<f64>() * self.randomness * 100.0
                } else {
                    0.0
                };
                ScoredMove {
                    from,
                    mv,
                    score: base_score + noise,
                }
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
    fn test_avoids_hanging_piece() {
        // 浅色 d4 走到 c3 会被 b2 吃掉，走到 e3 则安全
        let game = Game::from_fen("8/8/1d6/8/3l4/8/8/8 l").unwrap();
        let ai = GreedyAI::new(&AIConfig::default());
        let best = ai.select_best_move(&game).unwrap();
        assert_eq!(best.0, Square::new(4, 3));
        assert_eq!(best.1.destination(), Square::new(3, 4));
    }

    #[test]
    fn test_prefers_chain_start() {
        let game = Game::from_fen(test_positions::FORCED_CAPTURE).unwrap();
        let ai = GreedyAI::new(&AIConfig::default());
        let scored = ai.select_moves(&game, 5);
        assert_eq!(scored.len(), 1);
        assert!(scored[0].score > CAPTURE_SCORE);
    }

    #[test]
    fn test_prefers_promotion() {
        // 浅色 c1 升王，或 e5 前进
        let game = Game::from_fen("7d/2l5/8/8/8/4l3/8/8 l").unwrap();
        let ai = GreedyAI::new(&AIConfig::default());
        let best = ai.select_best_move(&game).unwrap();
        assert_eq!(best.0, Square::new(1, 2));
        assert_eq!(best.1.destination().row, 0);
    }
}
