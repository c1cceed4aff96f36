//! 局面记谱解析和生成
//!
//! 格式: `<棋盘> <回合> [<锁定格>]`
//!
//! 棋盘符号（第 0 行在前，行之间用 `/` 分隔）：
//! - 浅色方：l(兵) L(王)
//! - 深色方：d(兵) D(王)
//! - 空格：数字 (1-8)
//!
//! 回合为 `l` 或 `d`；锁定格为连吃中必须继续行动的棋子位置（如 `c3`），没有时为 `-` 或省略。

use crate::board::Board;
use crate::types::{parse_move_str, Color, Piece, Square, BOARD_SIZE};

/// 记谱解析后的状态
#[derive(Debug, Clone)]
pub struct FenState {
    pub board: Board,
    pub turn: Color,
    pub locked: Option<Square>,
}

/// 解析记谱字符串
pub fn parse_fen(fen: &str) -> Result<FenState, String> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(format!(
            "Invalid position format: expected '<board> <turn> [<locked>]', got: {}",
            fen
        ));
    }

    let board = parse_board(parts[0])?;

    let mut turn_chars = parts[1].chars();
    let turn = match (turn_chars.next(), turn_chars.next()) {
        (Some(c), None) => Color::from_fen_char(c),
        _ => None,
    }
    .ok_or_else(|| format!("Invalid turn: {}", parts[1]))?;

    let locked = match parts.get(2) {
        None | Some(&"-") => None,
        Some(s) => {
            let sq = Square::from_fen_str(s).ok_or_else(|| format!("Invalid locked square: {}", s))?;
            match board.get_piece(sq) {
                Some(p) if p.color == turn => Some(sq),
                _ => {
                    return Err(format!(
                        "Locked square {} does not hold a piece of the side to move",
                        sq
                    ))
                }
            }
        }
    };

    Ok(FenState {
        board,
        turn,
        locked,
    })
}

/// 解析棋盘字符串
fn parse_board(board_str: &str) -> Result<Board, String> {
    let rows: Vec<&str> = board_str.split('/').collect();
    if rows.len() != BOARD_SIZE as usize {
        return Err(format!("Invalid board: expected 8 rows, got {}", rows.len()));
    }

    let mut board = Board::empty();

    for (row_idx, row_str) in rows.iter().enumerate() {
        let row = row_idx as i8;
        let mut col: i8 = 0;

        for ch in row_str.chars() {
            if col >= BOARD_SIZE {
                return Err(format!("Row {} has more than 8 columns", row));
            }

            if let Some(n) = ch.to_digit(10) {
                if !(1..=8).contains(&n) {
                    return Err(format!("Invalid empty run in row {}: {}", row, ch));
                }
                col += n as i8;
            } else {
                let piece =
                    Piece::from_fen_char(ch).ok_or_else(|| format!("Invalid piece char: {}", ch))?;
                board.place(Square::new(row, col), piece)?;
                col += 1;
            }
        }

        if col != BOARD_SIZE {
            return Err(format!("Row {} has {} columns, expected 8", row, col));
        }
    }

    Ok(board)
}

/// 生成棋盘部分字符串
pub fn pieces_to_board_str(board: &Board) -> String {
    let mut rows = Vec::with_capacity(BOARD_SIZE as usize);

    for row in 0..BOARD_SIZE {
        let mut row_str = String::new();
        let mut empty_count = 0;

        for col in 0..BOARD_SIZE {
            match board.get_piece(Square::new(row, col)) {
                Some(piece) => {
                    if empty_count > 0 {
                        row_str.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row_str.push(piece.to_fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            row_str.push_str(&empty_count.to_string());
        }
        rows.push(row_str);
    }

    rows.join("/")
}

/// 生成完整记谱字符串
pub fn to_fen(board: &Board, turn: Color, locked: Option<Square>) -> String {
    match locked {
        Some(sq) => format!(
            "{} {} {}",
            board.to_board_str(),
            turn.to_fen_char(),
            sq
        ),
        None => format!("{} {}", board.to_board_str(), turn.to_fen_char()),
    }
}

/// 在记谱上执行走法，返回新的记谱
pub fn apply_move_to_fen(fen: &str, move_str: &str) -> Result<String, String> {
    let mut game = crate::game::Game::from_fen(fen)?;
    let (from, to) =
        parse_move_str(move_str).ok_or_else(|| format!("Invalid move string: {}", move_str))?;
    game.apply_move(from, to).map_err(|e| e.to_string())?;
    Ok(game.to_fen())
}
