//! 错误与提示信息
//!
//! 引擎内部没有致命错误：非法选择、非法走法、越界坐标都在本地恢复，
//! 终局是设计好的状态而不是故障。

use crate::types::{Color, Square};
use serde::Serialize;
use std::error::Error;
use std::fmt;

/// 给界面层显示的提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "side", rename_all = "snake_case")]
pub enum Hint {
    /// 所选格子没有棋子
    NoPiece,
    /// 选中了对方的棋子
    NotYourPiece,
    /// 连吃中必须继续使用锁定的棋子
    ContinueWithLockedPiece,
    /// 有其他棋子必须吃子
    CaptureWithAnotherPiece,
    /// 该棋子无路可走
    NoMovesAvailable,
    /// 请选择目标格
    ChooseDestination,
    /// 请选择吃子落点
    ChooseCapture,
    /// 继续连吃
    ContinueCapture,
    /// 棋子升王
    PieceCrowned,
    /// 某方必须吃子
    MandatoryCapture(Color),
    /// 某方获胜
    Victory(Color),
}

impl Hint {
    pub fn message(&self) -> String {
        match self {
            Hint::NoPiece => "There is no piece on that square.".to_string(),
            Hint::NotYourPiece => "That piece belongs to the other side.".to_string(),
            Hint::ContinueWithLockedPiece => {
                "You must continue with the selected piece.".to_string()
            }
            Hint::CaptureWithAnotherPiece => "Another piece must make the capture.".to_string(),
            Hint::NoMovesAvailable => "No moves available.".to_string(),
            Hint::ChooseDestination => "Choose a valid square.".to_string(),
            Hint::ChooseCapture => "Select a capture square.".to_string(),
            Hint::ContinueCapture => "Continue the capture sequence.".to_string(),
            Hint::PieceCrowned => "Piece crowned! It now moves in both directions.".to_string(),
            Hint::MandatoryCapture(color) => format!("Mandatory capture for {}.", color),
            Hint::Victory(color) => format!("{} wins!", color),
        }
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// 引擎拒绝操作的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// 坐标超出 8x8 棋盘
    InvalidSquare { row: i8, col: i8 },
    /// 选择的棋子不属于当前方，或违反强制吃子规则
    IllegalSelection { square: Square, hint: Hint },
    /// 目标不在当前合法走法集合中
    IllegalMove { from: Square, to: Square },
    /// 对局已结束，需要重新开始
    GameOver { winner: Color },
}

impl GameError {
    /// 对应的界面提示
    pub fn hint(&self) -> Option<Hint> {
        match self {
            GameError::IllegalSelection { hint, .. } => Some(*hint),
            GameError::GameOver { winner } => Some(Hint::Victory(*winner)),
            _ => None,
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidSquare { row, col } => {
                write!(f, "Invalid square ({}, {}): outside the 8x8 board", row, col)
            }
            GameError::IllegalSelection { square, hint } => {
                write!(f, "Illegal selection at {}: {}", square, hint)
            }
            GameError::IllegalMove { from, to } => {
                write!(f, "Illegal move {}{}", from, to)
            }
            GameError::GameOver { winner } => {
                write!(f, "Game is over ({} won); restart to play again", winner)
            }
        }
    }
}

impl Error for GameError {}

/// 在边界处校验坐标
pub fn check_square(square: Square) -> Result<Square, GameError> {
    if square.is_valid() {
        Ok(square)
    } else {
        Err(GameError::InvalidSquare {
            row: square.row,
            col: square.col,
        })
    }
}
