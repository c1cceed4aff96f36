//! AI 策略模块
//!
//! 提供随机和贪婪两种走法选择策略，以及自对弈驱动

mod greedy;
mod random;

pub use greedy::GreedyAI;
pub use random::RandomAI;

use crate::game::Game;
use crate::types::{Color, Move, Square};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::cmp::Ordering;

/// 可用策略名称
pub const AVAILABLE_STRATEGIES: &[&str] = &["random", "greedy"];

/// 默认策略
pub const DEFAULT_STRATEGY: &str = "greedy";

/// AI 配置
#[derive(Debug, Clone, Default)]
pub struct AIConfig {
    /// 随机性（0.0-1.0）
    pub randomness: f64,
    /// 随机种子
    pub seed: Option<u64>,
}

/// 走法评分
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMove {
    pub from: Square,
    pub mv: Move,
    pub score: f64,
}

impl ScoredMove {
    pub fn notation(&self) -> String {
        self.mv.to_fen_str(self.from)
    }
}

/// AI 策略接口
pub trait AIStrategy {
    /// 选择走法（返回带评分的走法列表）
    fn select_moves(&self, game: &Game, n: usize) -> Vec<ScoredMove>;

    /// 选择最佳走法
    fn select_best_move(&self, game: &Game) -> Option<(Square, Move)> {
        self.select_moves(game, 1)
            .first()
            .map(|sm| (sm.from, sm.mv))
    }
}

/// 排序辅助函数
pub(crate) fn sort_and_truncate(scored: &mut Vec<ScoredMove>, n: usize) {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(n);
}

pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// AI 引擎 - 统一的 AI 接口
pub struct AIEngine {
    strategy: Box<dyn AIStrategy>,
}

impl AIEngine {
    /// 创建随机 AI
    pub fn random(seed: Option<u64>) -> Self {
        AIEngine {
            strategy: Box::new(RandomAI::new(seed)),
        }
    }

    /// 创建贪婪 AI
    pub fn greedy(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(GreedyAI::new(config)),
        }
    }

    /// 从策略名称创建
    pub fn from_strategy(name: &str, config: &AIConfig) -> Result<Self, String> {
        match name.to_lowercase().as_str() {
            "random" => Ok(Self::random(config.seed)),
            "greedy" => Ok(Self::greedy(config)),
            _ => Err(format!(
                "Unknown strategy: {}. Available: {}",
                name,
                AVAILABLE_STRATEGIES.join(", ")
            )),
        }
    }

    pub fn strategy(&self) -> &dyn AIStrategy {
        self.strategy.as_ref()
    }

    /// 从记谱选择走法（返回带评分的走法字符串）
    pub fn select_moves_fen(&self, fen: &str, n: usize) -> Result<Vec<(String, f64)>, String> {
        let game = Game::from_fen(fen)?;
        let moves = self.strategy.select_moves(&game, n);
        Ok(moves
            .into_iter()
            .map(|sm| (sm.notation(), sm.score))
            .collect())
    }

    /// 从记谱选择最佳走法
    pub fn select_best_move_fen(&self, fen: &str) -> Result<Option<String>, String> {
        let game = Game::from_fen(fen)?;
        Ok(self
            .strategy
            .select_best_move(&game)
            .map(|(from, mv)| mv.to_fen_str(from)))
    }
}

/// 自对弈结果
#[derive(Debug, Clone, Serialize)]
pub struct PlayoutResult {
    /// 每一跳记为一步
    pub moves: Vec<String>,
    pub plies: usize,
    pub winner: Option<Color>,
    pub final_position: String,
}

/// 自对弈，直到分出胜负或达到步数上限
pub fn play_game(
    game: &mut Game,
    light: &dyn AIStrategy,
    dark: &dyn AIStrategy,
    max_plies: usize,
) -> PlayoutResult {
    let mut moves = Vec::new();

    while !game.is_over() && moves.len() < max_plies {
        let player = match game.turn() {
            Color::Light => light,
            Color::Dark => dark,
        };
        let (from, mv) = match player.select_best_move(game) {
            Some(choice) => choice,
            None => break,
        };
        match game.apply_move(from, mv.destination()) {
            Ok(outcome) => moves.push(outcome.notation),
            Err(e) => {
                debug!("strategy produced rejected move: {}", e);
                break;
            }
        }
    }

    let winner = game.winner();
    match winner {
        Some(color) => info!("Self-play finished after {} plies: {} wins", moves.len(), color),
        None => info!("Self-play stopped after {} plies without a winner", moves.len()),
    }

    PlayoutResult {
        plies: moves.len(),
        moves,
        winner,
        final_position: game.to_fen(),
    }
}
