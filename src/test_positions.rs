//! 跳棋测试局面库
//!
//! 提供命名的局面记谱，方便测试和调试
//!
//! 命名规范:
//! - START: 初始局面
//! - 吃子/连吃/升王: 强制吃子与连吃规则
//! - 终局: 胜负判定

// =============================================================================
// 开局
// =============================================================================

/// 初始局面 - 深色方在上 (0-2 行)，浅色方在下 (5-7 行)，浅色先走
pub const START: &str = "1d1d1d1d/d1d1d1d1/1d1d1d1d/8/8/l1l1l1l1/1l1l1l1l/l1l1l1l1 l";

/// 浅色 a5b4 之后
pub const AFTER_A5B4: &str = "1d1d1d1d/d1d1d1d1/1d1d1d1d/8/1l6/2l1l1l1/1l1l1l1l/l1l1l1l1 d";

/// 深色 b2 紧贴棋盘边的浅色 a3，跳吃落点 (4,-1) 在棋盘外
pub const EDGE_JUMP: &str = "1d1d1d1d/d1d1d1d1/1d1d1d1d/l7/8/2l1l1l1/1l1l1l1l/l1l1l1l1 d";

// =============================================================================
// 吃子 / 连吃 / 升王
// =============================================================================

/// 浅色 a5 必须吃 b4，落在 c3 后还能继续吃 d2
pub const FORCED_CAPTURE: &str = "8/8/3d4/8/1d6/l7/8/8 l";

/// FORCED_CAPTURE 第一跳之后，c3 被锁定
pub const MID_CHAIN: &str = "8/8/3d4/2l5/8/8/8/8 l c3";

/// 两个浅色棋子都能吃，a5 连吃时 g5 不能动
pub const TWO_CAPTURERS: &str = "8/8/3d4/8/1d3d2/l5l1/8/8 l";

/// 浅色 d2 吃 e1 升王，落点 f0 还能吃 g1，但升王结束连吃
pub const PROMOTION_CAPTURE: &str = "8/4d1d1/3l4/8/8/8/8/8 l";

/// 王的残局
pub const KINGS_ENDGAME: &str = "8/4D3/8/8/8/8/3L4/8 d";

/// 浅色王 d2 向后连吃 e3、e5，吃光深色
pub const KING_BACKWARD_CHAIN: &str = "8/8/3L4/4d3/8/4d3/8/8 l";

// =============================================================================
// 终局
// =============================================================================

/// 深色只剩 b4 一个子，浅色吃掉即胜
pub const LAST_DARK_PIECE: &str = "8/8/8/8/1d6/l1l1l1l1/1l1l1l1l/l1l1l1l1 l";

/// 深色 h6 被 g7 挡住，无路可走
pub const DARK_BLOCKED: &str = "8/8/8/8/8/8/7d/6l1 d";

/// 浅色王 f6 走到 g7 封死深色最后一个子
pub const BLOCKING_WIN: &str = "8/8/8/8/8/8/5L1d/8 l";

/// 所有测试局面
pub const ALL_POSITIONS: &[(&str, &str)] = &[
    ("START", START),
    ("AFTER_A5B4", AFTER_A5B4),
    ("EDGE_JUMP", EDGE_JUMP),
    ("FORCED_CAPTURE", FORCED_CAPTURE),
    ("MID_CHAIN", MID_CHAIN),
    ("TWO_CAPTURERS", TWO_CAPTURERS),
    ("PROMOTION_CAPTURE", PROMOTION_CAPTURE),
    ("KINGS_ENDGAME", KINGS_ENDGAME),
    ("KING_BACKWARD_CHAIN", KING_BACKWARD_CHAIN),
    ("LAST_DARK_PIECE", LAST_DARK_PIECE),
    ("DARK_BLOCKED", DARK_BLOCKED),
    ("BLOCKING_WIN", BLOCKING_WIN),
];

/// 按名称获取局面
pub fn get_position(name: &str) -> Option<&'static str> {
    ALL_POSITIONS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, fen)| *fen)
}
