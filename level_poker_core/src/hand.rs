use crate::card::{Card, Rank};
use crate::error::{LevelPokerError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

/// 牌型大类 (Tier)，从青铜到钻石
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Tier {
    Bronze = 1,
    Silver = 2,
    Gold = 3,
    Platinum = 4,
    Diamond = 5,
}

impl Tier {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// 牌型 (HandCategory)
/// 变体从小到大排列，与 (tier, category) 编码的顺序一致。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum HandCategory {
    HighCard,      // 高牌
    OnePair,       // 一对
    TwoPair,       // 两对
    ThreeOfAKind,  // 三条
    Straight,      // 顺子
    Flush,         // 同花
    FullHouse,     // 葫芦
    FourOfAKind,   // 四条
    StraightFlush, // 同花顺
    RoyalFlush,    // 皇家同花顺
}

impl HandCategory {
    pub const ALL: [HandCategory; 10] = [
        HandCategory::HighCard, HandCategory::OnePair, HandCategory::TwoPair,
        HandCategory::ThreeOfAKind, HandCategory::Straight, HandCategory::Flush,
        HandCategory::FullHouse, HandCategory::FourOfAKind, HandCategory::StraightFlush,
        HandCategory::RoyalFlush,
    ];

    pub fn tier(self) -> Tier {
        match self {
            HandCategory::HighCard | HandCategory::OnePair => Tier::Bronze,
            HandCategory::TwoPair | HandCategory::ThreeOfAKind => Tier::Silver,
            HandCategory::Straight | HandCategory::Flush => Tier::Gold,
            HandCategory::FullHouse | HandCategory::FourOfAKind => Tier::Platinum,
            HandCategory::StraightFlush | HandCategory::RoyalFlush => Tier::Diamond,
        }
    }

    /// 大类内部的编号。钻石级的 1、2 号留给尚未实现的扩展牌型。
    pub fn code(self) -> u8 {
        match self {
            HandCategory::HighCard
            | HandCategory::TwoPair
            | HandCategory::Straight
            | HandCategory::FullHouse => 1,
            HandCategory::OnePair
            | HandCategory::ThreeOfAKind
            | HandCategory::Flush
            | HandCategory::FourOfAKind => 2,
            HandCategory::StraightFlush => 3,
            HandCategory::RoyalFlush => 4,
        }
    }

    pub fn from_codes(tier: u8, category: u8) -> Option<HandCategory> {
        HandCategory::ALL
            .into_iter()
            .find(|c| c.tier().code() == tier && c.code() == category)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Tier::Bronze => "青铜",
            Tier::Silver => "白银",
            Tier::Gold => "黄金",
            Tier::Platinum => "铂金",
            Tier::Diamond => "钻石",
        })
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            HandCategory::HighCard => "高牌",
            HandCategory::OnePair => "一对",
            HandCategory::TwoPair => "两对",
            HandCategory::ThreeOfAKind => "三条",
            HandCategory::Straight => "顺子",
            HandCategory::Flush => "同花",
            HandCategory::FullHouse => "葫芦",
            HandCategory::FourOfAKind => "四条",
            HandCategory::StraightFlush => "同花顺",
            HandCategory::RoyalFlush => "皇家同花顺",
        })
    }
}

/// 牌力描述 (HandStrength)
///
/// 这个结构的设计是核心所在:
/// 1. 字段按重要性从高到低声明，派生的 `Ord` 就是逐字段的字典序比较。
/// 2. 不适用于当前牌型的字段为 `None`，`None` 比任何 `Some` 都小。
/// 3. 所有数值都从 0 开始: level/level1..5 是等级减 2，group1..5 是点数减 2。
///
/// 例如 `A♠³ K♣ 9♣ 7♦⁴ 2♥` 的描述是
/// `(0, 1, 1, 12, 11, 7, 5, 0, 1, 0, 0, 2, 0)`。
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct HandStrength {
    pub level: Option<u8>,
    pub tier: Option<u8>,
    pub category: Option<u8>,
    pub group1: Option<u8>,
    pub group2: Option<u8>,
    pub group3: Option<u8>,
    pub group4: Option<u8>,
    pub group5: Option<u8>,
    pub level1: Option<u8>,
    pub level2: Option<u8>,
    pub level3: Option<u8>,
    pub level4: Option<u8>,
    pub level5: Option<u8>,
}

impl HandStrength {
    fn new(level: u8, category: HandCategory, groups: &[u8], levels: &[u8]) -> HandStrength {
        let group = |i: usize| groups.get(i).copied();
        let lvl = |i: usize| levels.get(i).copied();
        HandStrength {
            level: Some(level),
            tier: Some(category.tier().code()),
            category: Some(category.code()),
            group1: group(0),
            group2: group(1),
            group3: group(2),
            group4: group(3),
            group5: group(4),
            level1: lvl(0),
            level2: lvl(1),
            level3: lvl(2),
            level4: lvl(3),
            level5: lvl(4),
        }
    }

    pub fn as_tuple(&self) -> [Option<u8>; 13] {
        [
            self.level, self.tier, self.category,
            self.group1, self.group2, self.group3, self.group4, self.group5,
            self.level1, self.level2, self.level3, self.level4, self.level5,
        ]
    }

    /// 把 13 个字段压成一个整数，每个字段占 4 位，`None` 记为 0。
    /// 整数的大小顺序与描述本身的比较顺序一致。
    pub fn strength_number(&self) -> u64 {
        self.as_tuple()
            .into_iter()
            .fold(0u64, |acc, field| (acc << 4) | field.map_or(0, |v| v as u64 + 1))
    }

    pub fn hand_category(&self) -> Option<HandCategory> {
        HandCategory::from_codes(self.tier?, self.category?)
    }

    pub fn groups(&self) -> Vec<u8> {
        [self.group1, self.group2, self.group3, self.group4, self.group5]
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn levels(&self) -> Vec<u8> {
        [self.level1, self.level2, self.level3, self.level4, self.level5]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// 显示格式: `L3 青铜 一对(A) 踢脚 K87`，L 后面是真实等级 (2..=14)
impl fmt::Display for HandStrength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ranks = |groups: &[u8]| -> String {
            groups
                .iter()
                .map(|&g| Rank::from_value(g + 2).map_or_else(|| "?".to_string(), |r| r.to_string()))
                .collect()
        };
        if let Some(level) = self.level {
            write!(f, "L{} ", level + 2)?;
        }
        let Some(category) = self.hand_category() else {
            return f.write_str("未知牌型");
        };
        write!(f, "{} ", category.tier())?;
        let groups = self.groups();
        // 决定牌型的组数，其余的组是踢脚
        let deciding = match category {
            HandCategory::OnePair | HandCategory::ThreeOfAKind | HandCategory::FourOfAKind => 1,
            HandCategory::TwoPair => 2,
            HandCategory::HighCard | HandCategory::Flush => {
                return write!(f, "{}({})", category, ranks(&groups[..]));
            }
            HandCategory::Straight | HandCategory::StraightFlush => {
                return write!(f, "{}({})", category, ranks(&groups[..groups.len().min(1)]));
            }
            HandCategory::FullHouse => {
                let pair = groups.iter().take(2).map(|&g| ranks(&[g])).collect::<Vec<_>>();
                return write!(f, "{}({})", category, pair.join(","));
            }
            HandCategory::RoyalFlush => return write!(f, "{}", category),
        };
        let (head, kickers) = groups.split_at(deciding.min(groups.len()));
        let head = head.iter().map(|&g| ranks(&[g])).collect::<Vec<_>>();
        write!(f, "{}({})", category, head.join(","))?;
        if !kickers.is_empty() {
            write!(f, " 踢脚 {}", ranks(kickers))?;
        }
        Ok(())
    }
}

// --- 牌型评估逻辑 ---

/// 评估一手 5 张牌的牌力
///
/// 纯函数，结果与输入顺序无关。
/// 牌数不是 5 张时返回 `InvalidHandSize`，有两张 (rank, suit) 相同的牌时返回 `DuplicateCard`。
pub fn evaluate(cards: &[Card]) -> Result<HandStrength> {
    if cards.len() != 5 {
        return Err(LevelPokerError::InvalidHandSize { expected: "5", actual: cards.len() });
    }
    check_duplicates(cards)?;
    Ok(evaluate_5_card_hand(cards))
}

/// 从 5 到 7 张牌中找出最优的 5 张牌组合牌力 (公共牌 + 底牌)
pub fn find_best_hand(all_cards: &[Card]) -> Result<HandStrength> {
    let card_count = all_cards.len();
    if !(5..=7).contains(&card_count) {
        return Err(LevelPokerError::InvalidHandSize { expected: "5..=7", actual: card_count });
    }
    check_duplicates(all_cards)?;

    // 枚举所有 5 张牌的组合，贪心地去掉小牌可能会破坏顺子或同花
    get_combinations(all_cards, 5)
        .iter()
        .map(|hand| evaluate_5_card_hand(hand))
        .max()
        .ok_or(LevelPokerError::InvalidHandSize { expected: "5..=7", actual: card_count })
}

fn check_duplicates(cards: &[Card]) -> Result<()> {
    for (i, card) in cards.iter().enumerate() {
        if let Some(other) = cards[i + 1..].iter().find(|other| other.same_face(card)) {
            return Err(LevelPokerError::DuplicateCard(*other));
        }
    }
    Ok(())
}

/// 调用前已保证正好 5 张且没有重复
fn evaluate_5_card_hand(hand: &[Card]) -> HandStrength {
    // 1. 整手牌的等级由最弱的一张决定
    let hand_level = hand.iter().map(|c| c.level.index()).min().unwrap_or(0) as u8;

    // 2. 按 (点数, 等级, 花色) 从大到小排序，得到唯一的规范顺序
    let mut cards = hand.to_vec();
    cards.sort_by_key(|c| Reverse((c.rank, c.level, c.suit)));

    // 3. 同花
    let is_flush = cards.windows(2).all(|w| w[0].suit == w[1].suit);

    // 4. 顺子。A-2-3-4-5 中 A 当作 1，移到最后；等级序列一起移动，保证位置一一对应
    let mut seq_ranks: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    let mut seq_levels: Vec<u8> = cards.iter().map(|c| c.level.index() as u8).collect();
    if seq_ranks == [14, 5, 4, 3, 2] {
        seq_ranks.rotate_left(1);
        seq_levels.rotate_left(1);
        seq_ranks[4] = 1;
    }
    let is_straight = seq_ranks.windows(2).all(|w| w[0] == w[1] + 1);
    let top = seq_ranks[0] - 2;

    if is_straight && is_flush {
        return if seq_ranks[0] == Rank::Ace.value() {
            HandStrength::new(hand_level, HandCategory::RoyalFlush, &[], &[])
        } else {
            HandStrength::new(hand_level, HandCategory::StraightFlush, &[top], &seq_levels)
        };
    }

    // 5. 统计点数出现次数，按 (次数, 点数, 等级, 花色) 重新排序，决定性的牌排在前面
    let mut counts: HashMap<Rank, u8> = HashMap::new();
    for card in &cards {
        *counts.entry(card.rank).or_insert(0) += 1;
    }
    cards.sort_by_key(|c| Reverse((counts[&c.rank], c.rank, c.level, c.suit)));

    let mut groups: Vec<u8> = cards.iter().map(|c| c.rank.value() - 2).collect();
    groups.dedup();
    let levels: Vec<u8> = cards.iter().map(|c| c.level.index() as u8).collect();

    let mut pattern: Vec<u8> = counts.into_values().collect();
    pattern.sort_by(|a, b| b.cmp(a));

    let category = match pattern.as_slice() {
        [4, 1] => HandCategory::FourOfAKind,
        [3, 2] => HandCategory::FullHouse,
        _ if is_flush => HandCategory::Flush,
        _ if is_straight => {
            return HandStrength::new(hand_level, HandCategory::Straight, &[top], &seq_levels);
        }
        [3, 1, 1] => HandCategory::ThreeOfAKind,
        [2, 2, 1] => HandCategory::TwoPair,
        [2, 1, 1, 1] => HandCategory::OnePair,
        _ => HandCategory::HighCard,
    };
    HandStrength::new(hand_level, category, &groups, &levels)
}

/// 辅助函数：从一个切片中生成所有大小为 k 的组合
fn get_combinations(data: &[Card], k: usize) -> Vec<Vec<Card>> {
    if k == 0 {
        return vec![vec![]];
    }
    if data.len() < k {
        return vec![];
    }

    let (first, rest) = data.split_at(1);

    // 包含第一个元素的组合
    let mut result = get_combinations(rest, k - 1);
    for combo in &mut result {
        combo.insert(0, first[0]);
    }

    // 不包含第一个元素的组合
    if data.len() > k {
        result.append(&mut get_combinations(rest, k));
    }

    result
}

// --- 单元测试 ---
