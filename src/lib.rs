//! Damas (checkers) rules engine
//!
//! 跳棋规则引擎 - 强制吃子、升王、连吃，支持局面记谱输入输出

pub mod ai;
pub mod board;
pub mod error;
pub mod fen;
pub mod game;
pub mod test_positions;
pub mod types;

pub use ai::{
    play_game, AIConfig, AIEngine, AIStrategy, GreedyAI, PlayoutResult, RandomAI, ScoredMove,
    AVAILABLE_STRATEGIES, DEFAULT_STRATEGY,
};
pub use board::{Board, MoveResult};
pub use error::{GameError, Hint};
pub use fen::{apply_move_to_fen, parse_fen, to_fen, FenState};
pub use game::{ClickOutcome, Continuation, Game, MoveOutcome, Selection, Snapshot};
pub use types::{parse_move_str, Color, GameStatus, Move, Piece, Square, BOARD_SIZE};

/// 从记谱获取行棋方所有合法走法
pub fn get_legal_moves_from_fen(fen: &str) -> Result<Vec<String>, String> {
    let game = Game::from_fen(fen)?;
    Ok(game
        .all_legal_moves()
        .iter()
        .map(|(from, mv)| mv.to_fen_str(*from))
        .collect())
}
