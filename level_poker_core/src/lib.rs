//! # Level Poker 核心库
//!
//! 每张牌除了点数和花色，还带有一个独立随机分配的等级 (Level)。
//! 这个 crate 包含三部分:
//! - 带等级的牌堆 (`deck`)，等级按权重表随机生成；
//! - 公共牌发牌状态机 (`board`)，保证 flop -> turn -> river 的顺序；
//! - 牌力评估 (`hand`)，把 5 张牌化为一个可直接比较大小的 `HandStrength`。
//!
//! 下注、奖池、玩家行为和统计分析都不在这里，由上层应用调用本库实现。

mod board;
mod card;
mod deck;
mod error;
mod hand;

pub use board::*;

pub use card::*;

pub use deck::*;

pub use error::*;

pub use hand::*;
