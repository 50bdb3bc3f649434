use crate::error::{LevelPokerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// --- 核心数据结构定义 ---

/// 花色 (Suit)
/// 序号固定为 0..=3，显示顺序与之相同
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Spade = 0,   // 黑桃 ♠
    Heart = 1,   // 红心 ♥
    Diamond = 2, // 方块 ♦
    Club = 3,    // 梅花 ♣
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// 点数 (Rank)
/// 判别值直接就是点数: 2 (Two) 到 14 (Ace)。
/// A-2-3-4-5 顺子中 Ace 当作 1 处理，这一点只在牌力评估里体现。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven,
        Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: u8) -> Option<Rank> {
        Rank::ALL.iter().copied().find(|r| r.value() == value)
    }
}

/// 等级 (Level)
///
/// 每张牌独立于点数和花色的第二强度属性，范围 2 (最弱) 到 14 (最强)。
/// 只能通过 [`Level::new`] 构造，保证永远在合法范围内。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

/// 等级上标，下标 0 对应 Level 2 (不显示)
const LEVEL_SUPERSCRIPTS: [&str; 13] = [
    "", "³", "⁴", "⁵",
    "⁶", "⁷", "⁸", "⁹",
    "¹⁰", "¹¹", "¹²", "¹³",
    "¹⁴",
];

impl Level {
    pub const MIN: Level = Level(2);
    pub const MAX: Level = Level(14);
    pub const ALL: [Level; 13] = [
        Level(2), Level(3), Level(4), Level(5), Level(6), Level(7), Level(8),
        Level(9), Level(10), Level(11), Level(12), Level(13), Level(14),
    ];

    pub fn new(value: u8) -> Result<Level> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Level(value))
        } else {
            Err(LevelPokerError::InvalidLevel(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// 从 0 开始的下标 (Level 2 => 0)，用于查表和牌力描述
    pub fn index(self) -> usize {
        (self.0 - Self::MIN.0) as usize
    }

    pub fn superscript(self) -> &'static str {
        LEVEL_SUPERSCRIPTS[self.index()]
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelPokerError;

    fn try_from(value: u8) -> Result<Self> {
        Level::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

/// 单张扑克牌 (Card)
///
/// 牌的身份只由 (rank, suit) 决定，level 是额外附加的属性。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub level: Level,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit, level: Level) -> Card {
        Card { rank, suit, level }
    }

    /// 最低等级 (Level 2) 的普通牌
    pub fn plain(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit, level: Level::MIN }
    }

    /// 是否是同一张物理牌 (忽略等级)
    pub fn same_face(&self, other: &Card) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Suit::Spade => "♠",
            Suit::Heart => "♥",
            Suit::Diamond => "♦",
            Suit::Club => "♣",
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "T",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.superscript())
    }
}

/// 显示格式: 点数 + 花色 + 等级上标，例如 `A♠¹⁴`、`T♥`
impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.rank, self.suit, self.level)
    }
}

// --- 单元测试 ---
