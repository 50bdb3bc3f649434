use crate::card::{Card, Level, Rank, Suit};
use crate::error::{LevelPokerError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// 等级权重表，下标 0 对应 Level 2，下标 12 对应 Level 14。
/// 每升一级权重减半，Level 2 与 Level 14 的比例为 4096:1。
pub const LEVEL_WEIGHTS: [u32; 13] = [4096, 2048, 1024, 512, 256, 128, 64, 32, 16, 8, 4, 2, 1];

/// 牌堆种类
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckKind {
    /// 标准 52 张，所有牌都是 Level 2
    Standard,
    /// 52 张，等级按权重随机分配
    #[default]
    Level,
    /// 短牌 36 张 (6 到 A)，等级只在 6 到 14 之间
    Short,
}

impl DeckKind {
    pub fn ranks(self) -> &'static [Rank] {
        match self {
            DeckKind::Short => &Rank::ALL[4..],
            DeckKind::Standard | DeckKind::Level => &Rank::ALL,
        }
    }

    /// 该种类允许的最低等级 (在权重表中的下标)
    fn min_level_index(self) -> usize {
        match self {
            DeckKind::Short => 4,
            DeckKind::Standard | DeckKind::Level => 0,
        }
    }

    pub fn size(self) -> usize {
        self.ranks().len() * Suit::ALL.len()
    }
}

/// 牌堆配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub kind: DeckKind,
    pub weights: [u32; 13],
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            kind: DeckKind::Level,
            weights: LEVEL_WEIGHTS,
        }
    }
}

impl DeckConfig {
    pub fn new(kind: DeckKind) -> Self {
        Self { kind, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.kind == DeckKind::Standard {
            return Ok(());
        }
        let usable = &self.weights[self.kind.min_level_index()..];
        let total = usable.iter().try_fold(0u32, |acc, &w| acc.checked_add(w));
        match total {
            None => Err(LevelPokerError::Config("weights overflow u32".into())),
            Some(0) => Err(LevelPokerError::Config(format!(
                "no positive weight for {:?} deck levels",
                self.kind
            ))),
            Some(_) => Ok(()),
        }
    }
}

/// 按累积权重抽取等级，可重复抽取 (有放回)
#[derive(Debug, Clone)]
struct LevelSampler {
    first_index: usize,
    cumulative: Vec<u32>,
    total: u32,
}

impl LevelSampler {
    fn new(first_level_index: usize, weights: &[u32]) -> Self {
        let mut total = 0;
        let cumulative = weights
            .iter()
            .map(|&w| {
                total += w;
                total
            })
            .collect();
        LevelSampler {
            first_index: first_level_index,
            cumulative,
            total,
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Level {
        let x = rng.random_range(0..self.total);
        // x < total，所以 offset 一定落在权重表内
        let offset = self.cumulative.partition_point(|&c| c <= x);
        Level::ALL[self.first_index + offset]
    }
}

/// 牌堆的能力接口
///
/// 牌桌 (`Board`) 只依赖这个接口，不关心具体是哪种牌堆。
pub trait Deck {
    /// 随机打乱所有未发出的牌，并重置发牌位置。已发出的牌不会再回到牌堆。
    fn shuffle(&mut self);

    /// 按顺序发出接下来的 `n` 张牌。剩余不足时返回 `DeckExhausted`，牌堆保持不变。
    fn deal(&mut self, n: usize) -> Result<Vec<Card>>;

    fn remaining_count(&self) -> usize;
}

/// 带等级的牌堆
///
/// 内部是一个 `Vec<Card>` 加上发牌游标，发牌时只移动游标。
#[derive(Debug, Clone)]
pub struct LevelDeck {
    kind: DeckKind,
    cards: Vec<Card>,
    cursor: usize,
    deck_level: Level,
    histogram: [usize; 13],
    rng: StdRng,
}

/// 创建一副新的、已洗好的 Level 牌堆 (52 张，使用系统熵作为种子)
pub fn new_deck() -> LevelDeck {
    let mut deck = LevelDeck::build(&DeckConfig::default(), StdRng::from_os_rng());
    deck.shuffle();
    deck
}

impl LevelDeck {
    /// 用给定的随机数生成器创建牌堆，牌按花色、点数顺序排列 (未洗牌)
    pub fn new(config: &DeckConfig, rng: StdRng) -> Result<LevelDeck> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    /// 用固定种子创建牌堆，相同种子得到相同的等级和洗牌结果
    pub fn with_seed(config: &DeckConfig, seed: u64) -> Result<LevelDeck> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: &DeckConfig, mut rng: StdRng) -> LevelDeck {
        let kind = config.kind;
        let sampler = match kind {
            DeckKind::Standard => None,
            DeckKind::Level | DeckKind::Short => {
                let first = kind.min_level_index();
                Some(LevelSampler::new(first, &config.weights[first..]))
            }
        };

        let mut cards = Vec::with_capacity(kind.size());
        let mut histogram = [0usize; 13];
        for &suit in &Suit::ALL {
            for &rank in kind.ranks() {
                let level = match &sampler {
                    Some(sampler) => sampler.sample(&mut rng),
                    None => Level::MIN,
                };
                histogram[level.index()] += 1;
                cards.push(Card::new(rank, suit, level));
            }
        }

        let deck_level = cards.iter().map(|c| c.level).min().unwrap_or(Level::MIN);
        debug!(?kind, deck_level = deck_level.value(), "created deck");

        LevelDeck {
            kind,
            cards,
            cursor: 0,
            deck_level,
            histogram,
            rng,
        }
    }

    pub fn kind(&self) -> DeckKind {
        self.kind
    }

    /// 牌堆等级: 生成时所有牌中的最低等级
    pub fn deck_level(&self) -> Level {
        self.deck_level
    }

    /// 生成时每个等级的牌数，下标 0 对应 Level 2
    pub fn level_histogram(&self) -> [usize; 13] {
        self.histogram
    }

    /// 尚未发出的牌
    pub fn undealt(&self) -> &[Card] {
        &self.cards[self.cursor..]
    }
}

impl Deck for LevelDeck {
    fn shuffle(&mut self) {
        self.cards.drain(..self.cursor);
        self.cursor = 0;
        self.cards.shuffle(&mut self.rng);
        trace!(remaining = self.cards.len(), "shuffled deck");
    }

    fn deal(&mut self, n: usize) -> Result<Vec<Card>> {
        let remaining = self.remaining_count();
        if n > remaining {
            return Err(LevelPokerError::DeckExhausted { requested: n, remaining });
        }
        let dealt = self.cards[self.cursor..self.cursor + n].to_vec();
        self.cursor += n;
        trace!(n, remaining = remaining - n, "dealt cards");
        Ok(dealt)
    }

    fn remaining_count(&self) -> usize {
        self.cards.len() - self.cursor
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seeded(kind: DeckKind, seed: u64) -> LevelDeck {
        LevelDeck::with_seed(&DeckConfig::new(kind), seed).unwrap()
    }

    #[test]
    fn test_new_deck_has_52_unique_faces() {
        let mut deck = new_deck();
        assert_eq!(deck.remaining_count(), 52);
        let cards = deck.deal(52).unwrap();
        let faces: HashSet<(Rank, Suit)> = cards.iter().map(|c| (c.rank, c.suit)).collect();
        assert_eq!(faces.len(), 52);
    }

    #[test]
    fn test_deck_exhaustion() {
        let mut deck = seeded(DeckKind::Level, 1);
        let mut total = 0;
        for n in [3, 1, 1, 2, 45] {
            total += deck.deal(n).unwrap().len();
        }
        assert_eq!(total, 52);
        assert_eq!(deck.remaining_count(), 0);
        assert_eq!(
            deck.deal(1),
            Err(LevelPokerError::DeckExhausted { requested: 1, remaining: 0 })
        );
    }

    #[test]
    fn test_failed_deal_leaves_deck_unchanged() {
        let mut deck = seeded(DeckKind::Level, 2);
        deck.deal(50).unwrap();
        assert_eq!(
            deck.deal(3),
            Err(LevelPokerError::DeckExhausted { requested: 3, remaining: 2 })
        );
        assert_eq!(deck.remaining_count(), 2);
        assert_eq!(deck.deal(2).unwrap().len(), 2);
    }

    #[test]
    fn test_shuffle_never_redeals() {
        let mut deck = seeded(DeckKind::Level, 3);
        let first = deck.deal(10).unwrap();
        deck.shuffle();
        assert_eq!(deck.remaining_count(), 42);
        let rest = deck.deal(42).unwrap();
        for card in &first {
            assert!(!rest.iter().any(|c| c.same_face(card)), "{} 被重复发出", card);
        }
    }

    #[test]
    fn test_seeded_decks_are_reproducible() {
        let mut a = seeded(DeckKind::Level, 42);
        let mut b = seeded(DeckKind::Level, 42);
        a.shuffle();
        b.shuffle();
        assert_eq!(a.deal(52).unwrap(), b.deal(52).unwrap());
    }

    #[test]
    fn test_standard_deck_is_all_level_two() {
        let deck = seeded(DeckKind::Standard, 4);
        assert_eq!(deck.kind(), DeckKind::Standard);
        assert!(deck.undealt().iter().all(|c| c.level == Level::MIN));
        assert_eq!(deck.level_histogram()[0], 52);
        assert_eq!(deck.deck_level(), Level::MIN);
    }

    #[test]
    fn test_short_deck() {
        let deck = seeded(DeckKind::Short, 5);
        assert_eq!(deck.kind(), DeckKind::Short);
        assert_eq!(deck.remaining_count(), 36);
        assert!(deck.undealt().iter().all(|c| c.rank >= Rank::Six));
        assert!(deck.undealt().iter().all(|c| c.level.value() >= 6));
        assert!(deck.deck_level().value() >= 6);
    }

    #[test]
    fn test_histogram_matches_cards() {
        let deck = seeded(DeckKind::Level, 6);
        assert_eq!(deck.level_histogram().iter().sum::<usize>(), 52);
        let min = deck.undealt().iter().map(|c| c.level).min().unwrap();
        assert_eq!(deck.deck_level(), min);
    }

    #[test]
    fn test_config_validation() {
        let zero = DeckConfig { kind: DeckKind::Level, weights: [0; 13] };
        assert!(matches!(zero.validate(), Err(LevelPokerError::Config(_))));

        // 短牌只看 Level 6 以上的权重
        let mut low_only = [0; 13];
        low_only[0] = 1;
        let short = DeckConfig { kind: DeckKind::Short, weights: low_only };
        assert!(short.validate().is_err());
        assert!(DeckConfig { kind: DeckKind::Level, weights: low_only }.validate().is_ok());

        let standard = DeckConfig { kind: DeckKind::Standard, weights: [0; 13] };
        assert!(standard.validate().is_ok());
        assert!(LevelDeck::with_seed(&zero, 0).is_err());
    }

    #[test]
    fn test_custom_weights_pin_levels() {
        let mut weights = [0; 13];
        weights[5] = 1; // 只允许 Level 7
        let deck = LevelDeck::with_seed(&DeckConfig { kind: DeckKind::Level, weights }, 7).unwrap();
        assert!(deck.undealt().iter().all(|c| c.level.value() == 7));
    }

    #[test]
    fn test_weighted_level_distribution() {
        let config = DeckConfig::default();
        let mut counts = [0usize; 13];
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..100_000 {
            let seed: u64 = rng.random();
            let deck = LevelDeck::with_seed(&config, seed).unwrap();
            for (total, n) in counts.iter_mut().zip(deck.level_histogram()) {
                *total += n;
            }
        }

        let ratio = counts[0] as f64 / counts[12] as f64;
        assert!((3000.0..5500.0).contains(&ratio), "level 2 : level 14 = {}", ratio);

        // 相邻等级大约是 2:1
        let ratio = counts[0] as f64 / counts[1] as f64;
        assert!((1.9..2.1).contains(&ratio), "level 2 : level 3 = {}", ratio);
    }
}
