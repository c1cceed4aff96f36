//! 对局控制
//!
//! `Game` 持有棋盘、行棋方、连吃锁定和当前选择，负责强制吃子过滤、
//! 走法校验、回合切换和胜负判定。界面层只通过这里提供的接口操作对局。

use crate::board::Board;
use crate::error::{check_square, GameError, Hint};
use crate::fen::{parse_fen, to_fen};
use crate::types::{Color, GameStatus, Move, Piece, Square};
use log::{debug, info};
use serde::Serialize;

/// 对局快照（供界面重绘）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub board: Vec<Vec<Option<Piece>>>,
    pub turn: Color,
    pub winner: Option<Color>,
    pub forced: Vec<Square>,
    pub locked: Option<Square>,
    pub selected: Option<Square>,
    pub light_count: usize,
    pub dark_count: usize,
    pub position: String,
}

/// 选中棋子后的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub square: Square,
    pub moves: Vec<Move>,
    pub hint: Hint,
}

/// 连吃续走信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Continuation {
    pub square: Square,
    pub moves: Vec<Move>,
}

/// 走棋结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveOutcome {
    pub from: Square,
    #[serde(rename = "move")]
    pub mv: Move,
    pub notation: String,
    pub promoted: bool,
    pub next_turn: Color,
    pub forced: Vec<Square>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<Continuation>,
    pub winner: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<Hint>,
    pub snapshot: Snapshot,
}

/// 点击格子的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClickOutcome {
    Selected(Selection),
    Deselected,
    Moved(MoveOutcome),
    Ignored,
}

/// 一局跳棋
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Color,
    /// 连吃中必须继续行动的棋子
    locked: Option<Square>,
    selected: Option<Square>,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// 初始局面，浅色先走
    pub fn new() -> Game {
        Game {
            board: Board::initial(),
            turn: Color::Light,
            locked: None,
            selected: None,
            status: GameStatus::InProgress,
        }
    }

    /// 从记谱创建对局
    ///
    /// 行棋方无子或无路可走时，直接判对方获胜。
    pub fn from_fen(fen: &str) -> Result<Game, String> {
        let state = parse_fen(fen)?;
        if let Some(sq) = state.locked {
            if !state.board.has_capture_from(sq) {
                return Err(format!("Locked square {} has no capture to continue", sq));
            }
        }

        let mut game = Game {
            board: state.board,
            turn: state.turn,
            locked: state.locked,
            selected: state.locked,
            status: GameStatus::InProgress,
        };
        if !game.side_can_play(game.turn) {
            game.status = GameStatus::GameOver {
                winner: game.turn.opposite(),
            };
        }
        Ok(game)
    }

    /// 重新开始
    pub fn reset(&mut self) -> Snapshot {
        *self = Game::new();
        info!("Game reset");
        self.snapshot()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn locked(&self) -> Option<Square> {
        self.locked
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Color> {
        self.status.winner()
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    pub fn to_fen(&self) -> String {
        to_fen(&self.board, self.turn, self.locked)
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        match self.status {
            GameStatus::InProgress => Ok(()),
            GameStatus::GameOver { winner } => Err(GameError::GameOver { winner }),
        }
    }

    fn side_can_play(&self, color: Color) -> bool {
        self.board.count(color) > 0 && self.board.has_any_moves(color)
    }

    /// 本回合必须吃子的棋子
    pub fn forced_squares(&self) -> Vec<Square> {
        if self.is_over() {
            return Vec::new();
        }
        match self.locked {
            Some(sq) => vec![sq],
            None => self.board.forced_squares(self.turn),
        }
    }

    /// 某格棋子本回合的合法走法（考虑行棋方、连吃锁定和强制吃子）
    pub fn legal_moves(&self, square: Square) -> Result<Vec<Move>, GameError> {
        check_square(square)?;
        Ok(self.moves_from(square))
    }

    fn moves_from(&self, square: Square) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        match self.board.get_piece(square) {
            Some(piece) if piece.color == self.turn => {}
            _ => return Vec::new(),
        }
        if let Some(locked) = self.locked {
            if locked != square {
                return Vec::new();
            }
        }

        let forced = self.forced_squares();
        if !forced.is_empty() && !forced.contains(&square) {
            return Vec::new();
        }

        let mut moves = self.board.moves_for(square);
        if !forced.is_empty() {
            moves.retain(|m| m.is_capture());
        }
        moves
    }

    /// 行棋方所有合法走法
    pub fn all_legal_moves(&self) -> Vec<(Square, Move)> {
        self.board
            .pieces(self.turn)
            .flat_map(|(sq, _)| self.moves_from(sq).into_iter().map(move |mv| (sq, mv)))
            .collect()
    }

    /// 选中棋子
    pub fn select(&mut self, square: Square) -> Result<Selection, GameError> {
        self.ensure_running()?;
        check_square(square)?;

        let reject = |hint: Hint| GameError::IllegalSelection { square, hint };

        let piece = self.board.get_piece(square).ok_or(reject(Hint::NoPiece))?;
        if piece.color != self.turn {
            return Err(reject(Hint::NotYourPiece));
        }
        if let Some(locked) = self.locked {
            if locked != square {
                return Err(reject(Hint::ContinueWithLockedPiece));
            }
        }
        let forced = self.forced_squares();
        if !forced.is_empty() && !forced.contains(&square) {
            return Err(reject(Hint::CaptureWithAnotherPiece));
        }

        let moves = self.moves_from(square);
        if moves.is_empty() {
            return Err(reject(Hint::NoMovesAvailable));
        }

        self.selected = Some(square);
        debug!("{} selected {} ({} moves)", self.turn, square, moves.len());

        let hint = if forced.is_empty() {
            Hint::ChooseDestination
        } else {
            Hint::ChooseCapture
        };
        Ok(Selection {
            square,
            moves,
            hint,
        })
    }

    /// 取消选择；连吃锁定时不能取消
    pub fn deselect(&mut self) -> bool {
        if self.locked.is_some() {
            return false;
        }
        self.selected.take().is_some()
    }

    /// 执行走法
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, GameError> {
        self.ensure_running()?;
        check_square(from)?;
        check_square(to)?;

        let mv = match self
            .moves_from(from)
            .into_iter()
            .find(|m| m.destination() == to)
        {
            Some(mv) => mv,
            None => {
                if self.locked.is_none() {
                    self.selected = None;
                }
                debug!("{} rejected move {}{}", self.turn, from, to);
                return Err(GameError::IllegalMove { from, to });
            }
        };

        let mover = self.turn;
        let result = self
            .board
            .apply_move(from, mv)
            .ok_or(GameError::IllegalMove { from, to })?;
        let notation = mv.to_fen_str(from);
        debug!("{} played {}", mover, notation);

        let mut hint = None;
        if result.promoted {
            debug!("{} piece crowned at {}", mover, to);
            hint = Some(Hint::PieceCrowned);
        }

        let continuation = if result.continued {
            self.locked = Some(to);
            self.selected = Some(to);
            hint = Some(Hint::ContinueCapture);
            debug!("{} must continue capturing from {}", mover, to);
            Some(Continuation {
                square: to,
                moves: self.moves_from(to),
            })
        } else {
            self.locked = None;
            self.selected = None;
            self.end_turn();
            None
        };

        let forced = self.forced_squares();
        if let Some(winner) = self.winner() {
            hint = Some(Hint::Victory(winner));
        } else if continuation.is_none() && !forced.is_empty() {
            hint = Some(Hint::MandatoryCapture(self.turn));
        }

        Ok(MoveOutcome {
            from,
            mv,
            notation,
            promoted: result.promoted,
            next_turn: self.turn,
            forced,
            continuation,
            winner: self.winner(),
            hint,
            snapshot: self.snapshot(),
        })
    }

    /// 结束回合：交换行棋方，对方无子或无路可走则当前方获胜
    fn end_turn(&mut self) {
        let mover = self.turn;
        let opponent = mover.opposite();
        self.turn = opponent;
        if !self.side_can_play(opponent) {
            self.status = GameStatus::GameOver { winner: mover };
            info!("Game over: {} wins", mover);
        }
    }

    /// 点击格子：选中己方棋子、再次点击取消、点击目标格走棋
    pub fn click(&mut self, square: Square) -> Result<ClickOutcome, GameError> {
        self.ensure_running()?;
        check_square(square)?;

        if let Some(piece) = self.board.get_piece(square) {
            if piece.color == self.turn {
                if self.selected == Some(square) && self.locked.is_none() {
                    self.selected = None;
                    return Ok(ClickOutcome::Deselected);
                }
                return self.select(square).map(ClickOutcome::Selected);
            }
        }

        let from = match self.selected {
            Some(sq) => sq,
            None => return Ok(ClickOutcome::Ignored),
        };
        if self
            .moves_from(from)
            .iter()
            .any(|m| m.destination() == square)
        {
            return self.apply_move(from, square).map(ClickOutcome::Moved);
        }
        Ok(ClickOutcome::Ignored)
    }

    /// 当前对局快照
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.rows(),
            turn: self.turn,
            winner: self.winner(),
            forced: self.forced_squares(),
            locked: self.locked,
            selected: self.selected,
            light_count: self.board.count(Color::Light),
            dark_count: self.board.count(Color::Dark),
            position: self.to_fen(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;

    fn sq(row: i8, col: i8) -> Square {
        Square::new(row, col)
    }

    #[test]
    fn test_new_game_snapshot() {
        let game = Game::new();
        let snap = game.snapshot();
        assert_eq!(snap.turn, Color::Light);
        assert_eq!(snap.winner, None);
        assert!(snap.forced.is_empty());
        assert_eq!(snap.light_count, 12);
        assert_eq!(snap.dark_count, 12);
        assert_eq!(snap.position, test_positions::START);
        assert_eq!(snap.board.len(), 8);
        assert!(snap.board.iter().all(|row| row.len() == 8));
    }

    #[test]
    fn test_opening_move_switches_turn() {
        let mut game = Game::new();
        let outcome = game.apply_move(sq(5, 0), sq(4, 1)).unwrap();
        assert_eq!(
            outcome.mv,
            Move::Simple {
                destination: sq(4, 1)
            }
        );
        assert!(!outcome.promoted);
        assert_eq!(outcome.next_turn, Color::Dark);
        assert!(outcome.continuation.is_none());
        assert_eq!(outcome.winner, None);
        assert_eq!(game.turn(), Color::Dark);
        assert_eq!(game.to_fen(), test_positions::AFTER_A5B4);
    }

    #[test]
    fn test_move_onto_occupied_edge_square_rejected() {
        let mut game = Game::from_fen(test_positions::EDGE_JUMP).unwrap();
        let before = game.to_fen();
        let err = game.apply_move(sq(2, 1), sq(3, 0)).unwrap_err();
        assert_eq!(
            err,
            GameError::IllegalMove {
                from: sq(2, 1),
                to: sq(3, 0)
            }
        );
        assert_eq!(game.to_fen(), before);
        assert_eq!(game.turn(), Color::Dark);

        // 棋盘外的跳吃落点在边界处被拒绝
        let err = game.apply_move(sq(2, 1), sq(4, -1)).unwrap_err();
        assert_eq!(err, GameError::InvalidSquare { row: 4, col: -1 });

        // 另一个方向正常
        assert!(game.apply_move(sq(2, 1), sq(3, 2)).is_ok());
    }

    #[test]
    fn test_wrong_side_cannot_move() {
        let mut game = Game::new();
        assert!(game.legal_moves(sq(2, 1)).unwrap().is_empty());
        let err = game.apply_move(sq(2, 1), sq(3, 0)).unwrap_err();
        assert!(matches!(err, GameError::IllegalMove { .. }));
    }

    #[test]
    fn test_forced_capture_filters_other_pieces() {
        let game = Game::from_fen(test_positions::TWO_CAPTURERS).unwrap();
        let mut forced = game.forced_squares();
        forced.sort();
        assert_eq!(forced, vec![sq(5, 0), sq(5, 6)]);

        let game = Game::from_fen("8/8/3d4/8/1d6/l5l1/8/8 l").unwrap();
        assert_eq!(game.forced_squares(), vec![sq(5, 0)]);
        // g5 有普通走法，但必须由 a5 吃子
        assert_eq!(game.board().moves_for(sq(5, 6)).len(), 2);
        assert!(game.legal_moves(sq(5, 6)).unwrap().is_empty());
        for (from, mv) in game.all_legal_moves() {
            assert_eq!(from, sq(5, 0));
            assert!(mv.is_capture());
        }
    }

    #[test]
    fn test_select_rejections() {
        let mut game = Game::from_fen("8/8/3d4/8/1d6/l5l1/8/8 l").unwrap();

        let err = game.select(sq(5, 6)).unwrap_err();
        assert_eq!(err.hint(), Some(Hint::CaptureWithAnotherPiece));
        assert_eq!(game.selected(), None);

        let err = game.select(sq(4, 1)).unwrap_err();
        assert_eq!(err.hint(), Some(Hint::NotYourPiece));

        let err = game.select(sq(3, 0)).unwrap_err();
        assert_eq!(err.hint(), Some(Hint::NoPiece));

        let err = game.select(sq(9, 0)).unwrap_err();
        assert_eq!(err, GameError::InvalidSquare { row: 9, col: 0 });

        let selection = game.select(sq(5, 0)).unwrap();
        assert_eq!(selection.hint, Hint::ChooseCapture);
        assert_eq!(selection.moves.len(), 1);
        assert_eq!(game.selected(), Some(sq(5, 0)));
    }

    #[test]
    fn test_select_piece_without_moves() {
        let mut game = Game::new();
        let err = game.select(sq(6, 1)).unwrap_err();
        assert_eq!(err.hint(), Some(Hint::NoMovesAvailable));

        let selection = game.select(sq(5, 2)).unwrap();
        assert_eq!(selection.hint, Hint::ChooseDestination);
        assert_eq!(selection.moves.len(), 2);
        assert!(game.deselect());
        assert!(!game.deselect());
    }

    #[test]
    fn test_simple_move_rejected_when_capture_forced() {
        let mut game = Game::from_fen(test_positions::FORCED_CAPTURE).unwrap();
        let err = game.apply_move(sq(5, 0), sq(4, 1)).unwrap_err();
        assert!(matches!(err, GameError::IllegalMove { .. }));
    }

    #[test]
    fn test_capture_chain_keeps_turn() {
        let mut game = Game::from_fen(test_positions::FORCED_CAPTURE).unwrap();
        let first = game.apply_move(sq(5, 0), sq(3, 2)).unwrap();
        assert_eq!(first.next_turn, Color::Light);
        assert_eq!(first.hint, Some(Hint::ContinueCapture));
        assert_eq!(first.forced, vec![sq(3, 2)]);
        let continuation = first.continuation.unwrap();
        assert_eq!(continuation.square, sq(3, 2));
        assert_eq!(
            continuation.moves,
            vec![Move::Capture {
                destination: sq(1, 4),
                captured: sq(2, 3)
            }]
        );
        assert_eq!(game.locked(), Some(sq(3, 2)));
        assert_eq!(game.to_fen(), test_positions::MID_CHAIN);

        let second = game.apply_move(sq(3, 2), sq(1, 4)).unwrap();
        assert!(second.continuation.is_none());
        assert_eq!(game.locked(), None);
        // 深色被吃光
        assert_eq!(second.winner, Some(Color::Light));
    }

    #[test]
    fn test_locked_piece_must_continue() {
        let mut game = Game::from_fen(test_positions::TWO_CAPTURERS).unwrap();
        game.apply_move(sq(5, 0), sq(3, 2)).unwrap();
        assert_eq!(game.turn(), Color::Light);

        // g5 也有吃子，但连吃锁定在 c3
        assert!(game.legal_moves(sq(5, 6)).unwrap().is_empty());
        let err = game.select(sq(5, 6)).unwrap_err();
        assert_eq!(err.hint(), Some(Hint::ContinueWithLockedPiece));
        assert!(game.apply_move(sq(5, 6), sq(3, 4)).is_err());
        assert!(!game.deselect());

        game.apply_move(sq(3, 2), sq(1, 4)).unwrap();
        assert_eq!(game.turn(), Color::Dark);
        // 深色 f4 现在必须吃 g5
        assert_eq!(game.forced_squares(), vec![sq(4, 5)]);
    }

    #[test]
    fn test_promotion_ends_chain() {
        let mut game = Game::from_fen(test_positions::PROMOTION_CAPTURE).unwrap();
        let outcome = game.apply_move(sq(2, 3), sq(0, 5)).unwrap();
        assert!(outcome.promoted);
        assert!(outcome.continuation.is_none());
        assert_eq!(outcome.next_turn, Color::Dark);
        assert_eq!(game.locked(), None);

        let king = game.snapshot().board[0][5];
        assert_eq!(king, Some(Piece::king(Color::Light)));

        // 升王后一直是王
        game.apply_move(sq(1, 6), sq(2, 7)).unwrap();
        let snap = game.snapshot();
        assert_eq!(snap.board[0][5], Some(Piece::king(Color::Light)));
    }

    #[test]
    fn test_king_moves_backward_in_chain() {
        let mut game = Game::from_fen(test_positions::KING_BACKWARD_CHAIN).unwrap();
        let first = game.apply_move(sq(2, 3), sq(4, 5)).unwrap();
        assert!(first.continuation.is_some());
        let second = game.apply_move(sq(4, 5), sq(6, 3)).unwrap();
        assert!(!second.promoted);
        assert_eq!(second.winner, Some(Color::Light));
        assert_eq!(second.snapshot.dark_count, 0);
    }

    #[test]
    fn test_last_piece_captured_wins() {
        let mut game = Game::from_fen(test_positions::LAST_DARK_PIECE).unwrap();
        let outcome = game.apply_move(sq(5, 0), sq(3, 2)).unwrap();
        assert_eq!(outcome.winner, Some(Color::Light));
        assert_eq!(outcome.hint, Some(Hint::Victory(Color::Light)));
        assert!(outcome.forced.is_empty());
        assert_eq!(
            game.status(),
            GameStatus::GameOver {
                winner: Color::Light
            }
        );
    }

    #[test]
    fn test_blocking_all_moves_wins() {
        let mut game = Game::from_fen(test_positions::BLOCKING_WIN).unwrap();
        assert!(!game.is_over());
        let outcome = game.apply_move(sq(6, 5), sq(7, 6)).unwrap();
        assert_eq!(outcome.winner, Some(Color::Light));
        assert_eq!(game.board().count(Color::Dark), 1);
    }

    #[test]
    fn test_loaded_position_without_moves_is_over() {
        let game = Game::from_fen(test_positions::DARK_BLOCKED).unwrap();
        assert_eq!(game.winner(), Some(Color::Light));
        assert!(game.forced_squares().is_empty());
        assert!(game.all_legal_moves().is_empty());
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut game = Game::from_fen(test_positions::LAST_DARK_PIECE).unwrap();
        game.apply_move(sq(5, 0), sq(3, 2)).unwrap();

        let winner = Color::Light;
        assert_eq!(
            game.apply_move(sq(5, 2), sq(4, 1)).unwrap_err(),
            GameError::GameOver { winner }
        );
        assert_eq!(
            game.select(sq(5, 2)).unwrap_err(),
            GameError::GameOver { winner }
        );
        assert!(game.click(sq(5, 2)).is_err());
        assert!(game.legal_moves(sq(5, 2)).unwrap().is_empty());

        let snap = game.reset();
        assert_eq!(snap.winner, None);
        assert_eq!(snap.position, test_positions::START);
        assert!(game.apply_move(sq(5, 2), sq(4, 1)).is_ok());
    }

    #[test]
    fn test_illegal_move_clears_selection() {
        let mut game = Game::new();
        game.select(sq(5, 2)).unwrap();
        assert!(game.apply_move(sq(5, 2), sq(3, 2)).is_err());
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn test_click_flow() {
        let mut game = Game::new();

        assert_eq!(game.click(sq(4, 1)).unwrap(), ClickOutcome::Ignored);

        match game.click(sq(5, 2)).unwrap() {
            ClickOutcome::Selected(sel) => assert_eq!(sel.square, sq(5, 2)),
            other => panic!("expected selection, got {:?}", other),
        }
        assert_eq!(game.click(sq(5, 2)).unwrap(), ClickOutcome::Deselected);

        game.click(sq(5, 2)).unwrap();
        // 点击非目标格不做任何事
        assert_eq!(game.click(sq(3, 2)).unwrap(), ClickOutcome::Ignored);
        // 点击对方棋子也不做任何事
        assert_eq!(game.click(sq(2, 1)).unwrap(), ClickOutcome::Ignored);

        match game.click(sq(4, 3)).unwrap() {
            ClickOutcome::Moved(outcome) => {
                assert_eq!(outcome.from, sq(5, 2));
                assert_eq!(outcome.next_turn, Color::Dark);
            }
            other => panic!("expected move, got {:?}", other),
        }
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn test_click_during_chain_keeps_selection() {
        let mut game = Game::from_fen(test_positions::FORCED_CAPTURE).unwrap();
        game.click(sq(5, 0)).unwrap();
        game.click(sq(3, 2)).unwrap();
        assert_eq!(game.selected(), Some(sq(3, 2)));
        // 连吃中再次点击不会取消选择
        assert!(matches!(
            game.click(sq(3, 2)).unwrap(),
            ClickOutcome::Selected(_)
        ));
        assert!(matches!(
            game.click(sq(1, 4)).unwrap(),
            ClickOutcome::Moved(_)
        ));
    }

    #[test]
    fn test_from_fen_rejects_stale_lock() {
        assert!(Game::from_fen("8/8/8/2l5/8/8/8/8 l c3").is_err());
        let game = Game::from_fen(test_positions::MID_CHAIN).unwrap();
        assert_eq!(game.selected(), Some(sq(3, 2)));
        assert_eq!(game.forced_squares(), vec![sq(3, 2)]);
    }

    #[test]
    fn test_mandatory_capture_hint() {
        let mut game = Game::from_fen("8/8/8/8/8/2d5/8/2l1l3 d").unwrap();
        // 深色 c5 走到 d6，浅色 c7、e7 都被迫吃子
        let outcome = game.apply_move(sq(5, 2), sq(6, 3)).unwrap();
        assert_eq!(outcome.forced, vec![sq(7, 2), sq(7, 4)]);
        assert_eq!(outcome.hint, Some(Hint::MandatoryCapture(Color::Light)));
    }

    #[test]
    fn test_outcome_serializes() {
        let mut game = Game::new();
        let outcome = game.apply_move(sq(5, 0), sq(4, 1)).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["move"]["type"], "simple");
        assert_eq!(json["next_turn"], "dark");
        assert_eq!(json["notation"], "a5b4");
        assert!(json.get("continuation").is_none());
    }
}
