//! Damas engine CLI
//!
//! 命令行界面
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 以 JSON 行通信，供界面层驱动一局棋

use clap::{Parser, Subcommand};
use damas_engine::{
    apply_move_to_fen, get_legal_moves_from_fen, parse_move_str, play_game, AIConfig, AIEngine,
    ClickOutcome, Game, GameError, Hint, Move, MoveOutcome, Selection, Snapshot, Square,
    DEFAULT_STRATEGY,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "damas-engine")]
#[command(about = "Damas (checkers) rules engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 获取合法走法
    Moves {
        /// 局面记谱
        #[arg(long)]
        fen: String,
    },

    /// 执行一步走法，输出新局面
    Apply {
        /// 局面记谱
        #[arg(long)]
        fen: String,

        /// 走法（如 a5b4 或 a5xc3）
        #[arg(long)]
        mv: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 选择最佳走法
    Best {
        /// 局面记谱
        #[arg(long)]
        fen: String,

        /// AI 策略 (random, greedy)
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        strategy: String,

        /// 返回的走法数量
        #[arg(long, default_value = "1")]
        n: usize,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 随机性（0.0-1.0）
        #[arg(long, default_value = "0.0")]
        randomness: f64,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 自对弈
    Selfplay {
        /// 起始局面，默认为初始局面
        #[arg(long)]
        fen: Option<String>,

        /// 浅色方策略
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        light: String,

        /// 深色方策略
        #[arg(long, default_value = "random")]
        dark: String,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 最大步数（每一跳记一步）
        #[arg(long, default_value = "400")]
        max_plies: usize,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

#[derive(Serialize, Deserialize)]
struct MoveResult {
    #[serde(rename = "move")]
    mv: String,
    score: f64,
}

#[derive(Serialize, Deserialize)]
struct MovesResponse {
    moves: Vec<MoveResult>,
    total: usize,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize, Default)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    fen: Option<String>,
    #[serde(default)]
    square: Option<Square>,
    #[serde(default)]
    from: Option<Square>,
    #[serde(default)]
    to: Option<Square>,
    /// 走法字符串，可替代 from/to
    #[serde(default)]
    mv: Option<String>,
    #[serde(default)]
    strategy: Option<String>,
    #[serde(default)]
    n: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Serialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<Hint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<Snapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    square: Option<Square>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_moves: Option<Vec<Move>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selection: Option<Selection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<MoveOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    click: Option<ClickOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<MoveResult>>,
}

impl ServerResponse {
    fn success_snapshot(snapshot: Snapshot) -> Self {
        Self {
            ok: true,
            snapshot: Some(snapshot),
            ..Default::default()
        }
    }

    fn success_legal_moves(square: Square, legal_moves: Vec<Move>) -> Self {
        Self {
            ok: true,
            square: Some(square),
            legal_moves: Some(legal_moves),
            ..Default::default()
        }
    }

    fn success_selection(selection: Selection) -> Self {
        Self {
            ok: true,
            hint: Some(selection.hint),
            message: Some(selection.hint.message()),
            selection: Some(selection),
            ..Default::default()
        }
    }

    fn success_outcome(outcome: MoveOutcome) -> Self {
        Self {
            ok: true,
            hint: outcome.hint,
            message: outcome.hint.map(|h| h.message()),
            outcome: Some(outcome),
            ..Default::default()
        }
    }

    fn success_click(click: ClickOutcome) -> Self {
        let hint = match &click {
            ClickOutcome::Selected(sel) => Some(sel.hint),
            ClickOutcome::Moved(outcome) => outcome.hint,
            ClickOutcome::Deselected | ClickOutcome::Ignored => None,
        };
        Self {
            ok: true,
            hint,
            message: hint.map(|h| h.message()),
            click: Some(click),
            ..Default::default()
        }
    }

    fn success_moves(moves: Vec<MoveResult>) -> Self {
        Self {
            ok: true,
            moves: Some(moves),
            ..Default::default()
        }
    }

    fn game_error(err: GameError) -> Self {
        let hint = err.hint();
        Self {
            ok: false,
            error: Some(err.to_string()),
            hint,
            message: hint.map(|h| h.message()),
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { fen } => match get_legal_moves_from_fen(&fen) {
            Ok(moves) => {
                println!("Legal moves ({}):", moves.len());
                for mv in &moves {
                    println!("  {}", mv);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Apply { fen, mv, json } => match apply_move_to_fen(&fen, &mv) {
            Ok(new_fen) => {
                if json {
                    let game = match Game::from_fen(&new_fen) {
                        Ok(game) => game,
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            std::process::exit(1);
                        }
                    };
                    print_json(&game.snapshot(), true);
                } else {
                    println!("{}", new_fen);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Best {
            fen,
            strategy,
            n,
            seed,
            randomness,
            json,
        } => {
            let config = AIConfig { randomness, seed };

            let ai = match AIEngine::from_strategy(&strategy, &config) {
                Ok(ai) => ai,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            match ai.select_moves_fen(&fen, n) {
                Ok(moves) => {
                    if json {
                        let response = MovesResponse {
                            total: moves.len(),
                            moves: moves
                                .into_iter()
                                .map(|(mv, score)| MoveResult { mv, score })
                                .collect(),
                        };
                        print_json(&response, true);
                    } else {
                        println!("Best moves (strategy={}):", strategy);
                        for (mv, score) in moves {
                            println!("  {} (score: {:.2})", mv, score);
                        }
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Selfplay {
            fen,
            light,
            dark,
            seed,
            max_plies,
            json,
        } => {
            let mut game = match fen.as_deref().map(Game::from_fen).transpose() {
                Ok(game) => game.unwrap_or_default(),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let light_config = AIConfig {
                randomness: 0.0,
                seed,
            };
            let dark_config = AIConfig {
                randomness: 0.0,
                seed: seed.map(|s| s.wrapping_add(1)),
            };
            let (light_ai, dark_ai) = match (
                AIEngine::from_strategy(&light, &light_config),
                AIEngine::from_strategy(&dark, &dark_config),
            ) {
                (Ok(l), Ok(d)) => (l, d),
                (Err(e), _) | (_, Err(e)) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let result = play_game(
                &mut game,
                light_ai.strategy(),
                dark_ai.strategy(),
                max_plies,
            );

            if json {
                print_json(&result, true);
            } else {
                for (i, mv) in result.moves.iter().enumerate() {
                    println!("{:>4}. {}", i + 1, mv);
                }
                match result.winner {
                    Some(winner) => println!("\nWinner: {} after {} plies", winner, result.plies),
                    None => println!("\nNo winner after {} plies", result.plies),
                }
                println!("Final position: {}", result.final_position);
            }
        }

        Commands::Server => {
            run_server();
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match out {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("Error: failed to serialize output: {}", e);
            std::process::exit(1);
        }
    }
}

/// Server 会话：持有一局棋
struct ServerSession {
    game: Game,
}

impl ServerSession {
    fn new() -> Self {
        ServerSession { game: Game::new() }
    }

    /// 处理一条请求；`quit` 返回 None
    fn handle(&mut self, request: &ServerRequest) -> Option<ServerResponse> {
        let response = match request.cmd.as_str() {
            "reset" => ServerResponse::success_snapshot(self.game.reset()),
            "load" => self.handle_load(request),
            "snapshot" => ServerResponse::success_snapshot(self.game.snapshot()),
            "moves" => self.handle_moves(request),
            "select" => self.handle_select(request),
            "deselect" => self.handle_deselect(),
            "click" => self.handle_click(request),
            "move" => self.handle_move(request),
            "best" => self.handle_best(request),
            "quit" => return None,
            _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
        };
        Some(response)
    }

    /// 处理 load 命令
    fn handle_load(&mut self, request: &ServerRequest) -> ServerResponse {
        let fen = match &request.fen {
            Some(fen) => fen,
            None => return ServerResponse::error("Missing field: fen"),
        };
        match Game::from_fen(fen) {
            Ok(game) => {
                self.game = game;
                info!("Loaded position {}", fen);
                ServerResponse::success_snapshot(self.game.snapshot())
            }
            Err(e) => ServerResponse::error(&format!("Invalid position: {}", e)),
        }
    }

    /// 处理 moves 命令：指定格子的合法走法
    fn handle_moves(&self, request: &ServerRequest) -> ServerResponse {
        let square = match request.square {
            Some(sq) => sq,
            None => return ServerResponse::error("Missing field: square"),
        };
        match self.game.legal_moves(square) {
            Ok(moves) => ServerResponse::success_legal_moves(square, moves),
            Err(e) => ServerResponse::game_error(e),
        }
    }

    /// 处理 select 命令
    fn handle_select(&mut self, request: &ServerRequest) -> ServerResponse {
        let square = match request.square {
            Some(sq) => sq,
            None => return ServerResponse::error("Missing field: square"),
        };
        match self.game.select(square) {
            Ok(selection) => ServerResponse::success_selection(selection),
            Err(e) => ServerResponse::game_error(e),
        }
    }

    /// 处理 deselect 命令；连吃锁定时拒绝
    fn handle_deselect(&mut self) -> ServerResponse {
        if !self.game.deselect() && self.game.locked().is_some() {
            let hint = Hint::ContinueWithLockedPiece;
            return ServerResponse {
                ok: false,
                error: Some("Cannot deselect during a capture sequence".to_string()),
                hint: Some(hint),
                message: Some(hint.message()),
                snapshot: Some(self.game.snapshot()),
                ..Default::default()
            };
        }
        ServerResponse::success_snapshot(self.game.snapshot())
    }

    /// 处理 click 命令
    fn handle_click(&mut self, request: &ServerRequest) -> ServerResponse {
        let square = match request.square {
            Some(sq) => sq,
            None => return ServerResponse::error("Missing field: square"),
        };
        match self.game.click(square) {
            Ok(click) => ServerResponse::success_click(click),
            Err(e) => ServerResponse::game_error(e),
        }
    }

    /// 处理 move 命令：from/to 或走法字符串
    fn handle_move(&mut self, request: &ServerRequest) -> ServerResponse {
        let (from, to) = match (&request.mv, request.from, request.to) {
            (Some(mv), _, _) => match parse_move_str(mv) {
                Some(pair) => pair,
                None => return ServerResponse::error(&format!("Invalid move string: {}", mv)),
            },
            (None, Some(from), Some(to)) => (from, to),
            _ => return ServerResponse::error("Missing fields: from/to or mv"),
        };
        match self.game.apply_move(from, to) {
            Ok(outcome) => ServerResponse::success_outcome(outcome),
            Err(e) => ServerResponse::game_error(e),
        }
    }

    /// 处理 best 命令：为当前局面推荐走法
    fn handle_best(&self, request: &ServerRequest) -> ServerResponse {
        let strategy = request.strategy.as_deref().unwrap_or(DEFAULT_STRATEGY);
        let n = request.n.unwrap_or(5);
        let config = AIConfig {
            randomness: 0.0,
            seed: request.seed,
        };

        let ai = match AIEngine::from_strategy(strategy, &config) {
            Ok(ai) => ai,
            Err(e) => return ServerResponse::error(&format!("Invalid strategy: {}", e)),
        };

        let moves = ai
            .strategy()
            .select_moves(&self.game, n)
            .into_iter()
            .map(|sm| MoveResult {
                mv: sm.notation(),
                score: sm.score,
            })
            .collect();
        ServerResponse::success_moves(moves)
    }
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut session = ServerSession::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        // 解析请求
        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                warn!("Rejected request: {}", e);
                let response = ServerResponse::error(&format!("Invalid JSON: {}", e));
                print_json(&response, false);
                let _ = stdout.flush();
                continue;
            }
        };

        // 处理命令
        let response = match session.handle(&request) {
            Some(response) => response,
            None => break,
        };
        if !response.ok {
            warn!("Command {} failed: {:?}", request.cmd, response.error);
        }

        // 返回响应
        print_json(&response, false);
        let _ = stdout.flush();
    }
}
