//! Level Poker 模拟器
//!
//! 按配置反复发牌，统计各等级的出现频率、牌堆等级分布，以及公共牌和最优手牌的等级、牌型分布。
//! 用法: `level_poker_sim [config.json]`，日志级别由 `RUST_LOG` 控制。

mod config;

use std::collections::BTreeMap;
use std::path::PathBuf;

use level_poker_core::{
    evaluate, find_best_hand, Board, Deck, HandCategory, HandStrength, LevelDeck, LevelPokerError,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use config::SimConfig;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("读取配置失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析配置失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("配置错误: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] LevelPokerError),
}

/// 模拟结果汇总
#[derive(Debug, Default, Serialize)]
struct Report {
    rounds: u64,
    /// 每个等级 (2..=14) 的牌数
    card_levels: BTreeMap<u8, u64>,
    /// 牌堆等级 (最低等级) 的分布
    deck_levels: BTreeMap<u8, u64>,
    /// 5 张公共牌的手牌等级 (2..=14) 分布
    board_levels: BTreeMap<u8, u64>,
    /// 5 张公共牌本身的牌型分布
    board_categories: BTreeMap<String, u64>,
    /// 每位玩家最优 5 张的手牌等级分布
    hand_levels: BTreeMap<u8, u64>,
    /// 每位玩家最优 5 张的牌型分布
    best_hand_categories: BTreeMap<String, u64>,
    strongest_board: Option<String>,
}

fn category_name(strength: &HandStrength) -> String {
    strength
        .hand_category()
        .map_or_else(|| "未知牌型".to_string(), |c: HandCategory| c.to_string())
}

/// 描述里的 level 从 0 开始，报告里用真实等级
fn real_level(strength: &HandStrength) -> u8 {
    strength.level.map_or(0, |l| l + 2)
}

fn run(config: &SimConfig) -> Result<Report, SimError> {
    config.validate()?;
    let mut report = Report { rounds: config.rounds, ..Report::default() };
    let mut strongest: Option<HandStrength> = None;

    for round in 0..config.rounds {
        let mut deck = LevelDeck::with_seed(&config.deck, config.seed.wrapping_add(round))?;
        let kind = deck.kind();
        for (index, count) in deck.level_histogram().into_iter().enumerate() {
            *report.card_levels.entry(index as u8 + 2).or_insert(0) += count as u64;
        }
        *report.deck_levels.entry(deck.deck_level().value()).or_insert(0) += 1;
        deck.shuffle();

        let hole_cards: Vec<Vec<_>> = (0..config.players)
            .map(|_| deck.deal(2))
            .collect::<Result<_, _>>()?;

        let mut board = Board::new(&mut deck);
        let board_cards = board.run_it_once()?.to_vec();
        let board_strength = evaluate(&board_cards)?;
        *report.board_levels.entry(real_level(&board_strength)).or_insert(0) += 1;
        *report.board_categories.entry(category_name(&board_strength)).or_insert(0) += 1;
        if strongest.is_none_or(|s| board_strength > s) {
            strongest = Some(board_strength);
        }

        for hole in &hole_cards {
            let mut cards = board_cards.clone();
            cards.extend_from_slice(hole);
            let best = find_best_hand(&cards)?;
            *report.hand_levels.entry(real_level(&best)).or_insert(0) += 1;
            *report.best_hand_categories.entry(category_name(&best)).or_insert(0) += 1;
        }

        debug!(round, ?kind, board = %board_strength, "round finished");
    }

    report.strongest_board = strongest.map(|s| s.to_string());
    Ok(report)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    info!(rounds = config.rounds, players = config.players, kind = ?config.deck.kind, "开始模拟");

    match run(&config) {
        Ok(report) => {
            info!(strongest = ?report.strongest_board, "模拟完成");
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("序列化结果失败: {}", e),
            }
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
