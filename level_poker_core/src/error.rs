use crate::board::BoardPhase;
use crate::card::Card;
use thiserror::Error;

/// 核心库中所有可能出现的错误
///
/// 这些都是同步的、本地的校验错误，调用方应当通过正确的调用顺序避免它们，
/// 因此不存在重试的意义。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelPokerError {
    #[error("手牌必须正好是 {expected} 张, 实际为 {actual} 张")]
    InvalidHandSize { expected: &'static str, actual: usize },

    #[error("重复的牌: {0}")]
    DuplicateCard(Card),

    #[error("牌堆不足: 请求 {requested} 张, 剩余 {remaining} 张")]
    DeckExhausted { requested: usize, remaining: usize },

    #[error("发牌顺序错误: 不能在 {phase:?} 阶段发 {street}")]
    InvalidDealOrder { street: &'static str, phase: BoardPhase },

    #[error("不支持的多次发牌 (run it {runs} times)")]
    UnsupportedRunOut { runs: u8 },

    #[error("等级超出范围 [2, 14]: {0}")]
    InvalidLevel(u8),

    #[error("配置错误: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LevelPokerError>;
