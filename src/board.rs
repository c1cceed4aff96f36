//! 跳棋棋盘
//!
//! 使用定长数组存储 64 个格子，走法生成和强制吃子扫描都直接在数组上进行。

use crate::fen::{parse_fen, pieces_to_board_str};
use crate::types::{Color, Move, Piece, Square, ALL_DIAGONALS, BOARD_SIZE};

/// 执行走法的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    /// 本步是否升王
    pub promoted: bool,
    /// 同一棋子是否必须继续连吃
    pub continued: bool,
}

/// 棋盘（64 格，棋子只会出现在暗格上）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

impl Board {
    /// 空棋盘
    pub fn empty() -> Board {
        Board {
            squares: [None; 64],
        }
    }

    /// 初始局面：深色方占 0-2 行暗格，浅色方占 5-7 行暗格
    pub fn initial() -> Board {
        let mut board = Board::empty();
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            if !sq.is_playable() {
                continue;
            }
            if sq.row < 3 {
                board.squares[idx] = Some(Piece::man(Color::Dark));
            } else if sq.row > 4 {
                board.squares[idx] = Some(Piece::man(Color::Light));
            }
        }
        board
    }

    /// 从记谱字符串创建棋盘（忽略行棋方）
    pub fn from_fen(fen: &str) -> Result<Board, String> {
        let state = parse_fen(fen)?;
        Ok(state.board)
    }

    /// 棋盘部分的记谱字符串
    pub fn to_board_str(&self) -> String {
        pieces_to_board_str(self)
    }

    /// 获取某位置的棋子
    #[inline]
    pub fn get_piece(&self, sq: Square) -> Option<Piece> {
        if !sq.is_valid() {
            return None;
        }
        self.squares[sq.to_index()]
    }

    /// 放置棋子，只允许暗格
    pub fn place(&mut self, sq: Square, piece: Piece) -> Result<(), String> {
        if !sq.is_playable() {
            return Err(format!("Square {} is not a playable square", sq));
        }
        self.squares[sq.to_index()] = Some(piece);
        Ok(())
    }

    /// 移除棋子并返回
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        if !sq.is_valid() {
            return None;
        }
        self.squares[sq.to_index()].take()
    }

    #[inline]
    fn is_empty_square(&self, sq: Square) -> bool {
        sq.is_valid() && self.squares[sq.to_index()].is_none()
    }

    /// 某方所有棋子（按行优先顺序）
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(move |(idx, p)| match p {
                Some(piece) if piece.color == color => Some((Square::from_index(idx), *piece)),
                _ => None,
            })
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces(color).count()
    }

    /// 按行输出棋盘（供快照使用）
    pub fn rows(&self) -> Vec<Vec<Option<Piece>>> {
        self.squares
            .chunks(BOARD_SIZE as usize)
            .map(|row| row.to_vec())
            .collect()
    }

    /// 某格棋子的所有走法
    ///
    /// 兵只能向前斜走，王四个方向都能走；吃子四个方向都可以。
    /// 只要存在吃子，就不返回普通走法。不展开连吃，只看一步。
    pub fn moves_for(&self, from: Square) -> Vec<Move> {
        let piece = match self.get_piece(from) {
            Some(p) => p,
            None => return Vec::new(),
        };

        let captures = self.captures_for(from, piece);
        if !captures.is_empty() {
            return captures;
        }

        let mut moves = Vec::with_capacity(4);
        for &(dr, dc) in piece.step_directions() {
            let to = from.offset(dr, dc);
            if self.is_empty_square(to) {
                moves.push(Move::Simple { destination: to });
            }
        }
        moves
    }

    fn captures_for(&self, from: Square, piece: Piece) -> Vec<Move> {
        let mut captures = Vec::new();
        for (dr, dc) in ALL_DIAGONALS {
            let over = from.offset(dr, dc);
            let landing = over.offset(dr, dc);
            if !self.is_empty_square(landing) {
                continue;
            }
            match self.get_piece(over) {
                Some(target) if target.color != piece.color => {
                    captures.push(Move::Capture {
                        destination: landing,
                        captured: over,
                    });
                }
                _ => {}
            }
        }
        captures
    }

    /// 某格棋子是否有吃子走法
    pub fn has_capture_from(&self, from: Square) -> bool {
        match self.get_piece(from) {
            Some(piece) => !self.captures_for(from, piece).is_empty(),
            None => false,
        }
    }

    /// 强制吃子扫描：某方所有能吃子的棋子位置
    pub fn forced_squares(&self, color: Color) -> Vec<Square> {
        self.pieces(color)
            .filter(|&(sq, piece)| !self.captures_for(sq, piece).is_empty())
            .map(|(sq, _)| sq)
            .collect()
    }

    /// 某方是否还有任何走法（普通或吃子）
    pub fn has_any_moves(&self, color: Color) -> bool {
        self.pieces(color).any(|(sq, _)| !self.moves_for(sq).is_empty())
    }

    /// 执行走法：先清空起点，再落子、移除被吃子、判断升王与连吃
    ///
    /// 走法不在 `moves_for(from)` 中时返回 None，棋盘不变。
    /// 不考虑行棋方和全局强制吃子，这些由 `Game` 负责。
    pub fn apply_move(&mut self, from: Square, mv: Move) -> Option<MoveResult> {
        if !self.moves_for(from).contains(&mv) {
            return None;
        }
        let mut piece = self.remove(from)?;
        let to = mv.destination();

        if let Some(captured) = mv.captured() {
            self.remove(captured);
        }

        let promoted = !piece.is_king && to.row == piece.color.promotion_row();
        if promoted {
            piece.is_king = true;
        }
        self.squares[to.to_index()] = Some(piece);

        let continued = mv.is_capture() && !promoted && self.has_capture_from(to);

        Some(MoveResult {
            promoted,
            continued,
        })
    }
}
