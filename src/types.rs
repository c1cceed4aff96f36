//! 跳棋核心类型定义
//!
//! 定义跳棋中所有基础数据类型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 棋盘边长
pub const BOARD_SIZE: i8 = 8;

/// 棋子颜色/阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// 浅色方（先手，初始在 5-7 行，向 0 行前进）
    Light,
    /// 深色方（初始在 0-2 行，向 7 行前进）
    Dark,
}

impl Color {
    /// 获取对方阵营
    pub fn opposite(&self) -> Color {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// 兵的前进方向（行增量）
    pub fn forward(&self) -> i8 {
        match self {
            Color::Light => -1,
            Color::Dark => 1,
        }
    }

    /// 升变行：离己方起始边最远的一行
    pub fn promotion_row(&self) -> i8 {
        match self {
            Color::Light => 0,
            Color::Dark => BOARD_SIZE - 1,
        }
    }

    /// 从记谱字符解析
    pub fn from_fen_char(c: char) -> Option<Color> {
        match c {
            'l' => Some(Color::Light),
            'd' => Some(Color::Dark),
            _ => None,
        }
    }

    /// 转换为记谱字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Color::Light => 'l',
            Color::Dark => 'd',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Light => write!(f, "Light"),
            Color::Dark => write!(f, "Dark"),
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub is_king: bool,
}

impl Piece {
    pub fn man(color: Color) -> Self {
        Piece {
            color,
            is_king: false,
        }
    }

    pub fn king(color: Color) -> Self {
        Piece {
            color,
            is_king: true,
        }
    }

    /// 简单走法可用的方向
    pub fn step_directions(&self) -> &'static [(i8, i8)] {
        if self.is_king {
            return &ALL_DIAGONALS;
        }
        match self.color {
            Color::Light => &[(-1, -1), (-1, 1)],
            Color::Dark => &[(1, -1), (1, 1)],
        }
    }

    /// 从记谱字符解析（小写为兵，大写为王）
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let color = Color::from_fen_char(c.to_ascii_lowercase())?;
        Some(Piece {
            color,
            is_king: c.is_ascii_uppercase(),
        })
    }

    /// 转换为记谱字符
    pub fn to_fen_char(&self) -> char {
        let c = self.color.to_fen_char();
        if self.is_king {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

/// 四个斜向（吃子在四个方向都可以）
pub const ALL_DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// 棋盘位置 (row, col)
///
/// row: 0-7 (0 是深色方底线，7 是浅色方底线)
/// col: 0-7 (从左到右)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    pub fn new(row: i8, col: i8) -> Self {
        Square { row, col }
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// 是否为可落子的暗格
    #[inline]
    pub fn is_playable(&self) -> bool {
        self.is_valid() && (self.row + self.col) % 2 == 1
    }

    /// 位置加偏移量
    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Square {
        Square {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    #[inline]
    pub fn to_index(&self) -> usize {
        (self.row as usize) * (BOARD_SIZE as usize) + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Square {
        Square {
            row: (idx / BOARD_SIZE as usize) as i8,
            col: (idx % BOARD_SIZE as usize) as i8,
        }
    }

    /// 从坐标字符串解析（如 "a5" 即第 5 行第 0 列）
    pub fn from_fen_str(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let col_char = chars.next()?;
        let row_char = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let col = match col_char {
            'a'..='h' => (col_char as i8) - ('a' as i8),
            _ => return None,
        };
        let row = match row_char {
            '0'..='7' => (row_char as i8) - ('0' as i8),
            _ => return None,
        };
        Some(Square { row, col })
    }

    /// 转换为坐标字符串；棋盘外的位置输出为 `(row,col)`
    pub fn to_fen_str(&self) -> String {
        if !self.is_valid() {
            return format!("({},{})", self.row, self.col);
        }
        let col_char = (b'a' + self.col as u8) as char;
        format!("{}{}", col_char, self.row)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_str())
    }
}

/// 走法：普通斜走一格，或跳吃
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Move {
    Simple {
        destination: Square,
    },
    Capture {
        destination: Square,
        captured: Square,
    },
}

impl Move {
    #[inline]
    pub fn destination(&self) -> Square {
        match self {
            Move::Simple { destination } | Move::Capture { destination, .. } => *destination,
        }
    }

    #[inline]
    pub fn captured(&self) -> Option<Square> {
        match self {
            Move::Simple { .. } => None,
            Move::Capture { captured, .. } => Some(*captured),
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        matches!(self, Move::Capture { .. })
    }

    /// 转换为走法字符串（如 `a5b4`，吃子为 `a5xc3`）
    pub fn to_fen_str(&self, from: Square) -> String {
        let sep = if self.is_capture() { "x" } else { "" };
        format!("{}{}{}", from, sep, self.destination())
    }
}

/// 解析走法字符串，返回 (起点, 终点)
///
/// 接受 `a5b4`、`a5c3` 和 `a5xc3`，是否吃子由走法生成决定。
pub fn parse_move_str(s: &str) -> Option<(Square, Square)> {
    let s = s.trim();
    if !s.is_ascii() {
        return None;
    }
    let (from, to) = match s.len() {
        4 => (&s[0..2], &s[2..4]),
        5 if &s[2..3] == "x" => (&s[0..2], &s[3..5]),
        _ => return None,
    };
    Some((Square::from_fen_str(from)?, Square::from_fen_str(to)?))
}

/// 游戏状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    GameOver { winner: Color },
}

impl GameStatus {
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::GameOver { winner } => Some(*winner),
        }
    }
}
