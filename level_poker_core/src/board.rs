use crate::card::Card;
use crate::deck::Deck;
use crate::error::{LevelPokerError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 公共牌的发牌阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardPhase {
    Empty,
    FlopDealt,
    TurnDealt,
    RiverDealt,
}

/// 公共牌 (Board)
///
/// 按 flop -> turn -> river 的顺序从牌堆中取牌。牌桌只借用牌堆，
/// 不负责牌堆的生命周期；借用期间牌堆不能被其他人修改。
#[derive(Debug)]
pub struct Board<'a, D: Deck + ?Sized> {
    deck: &'a mut D,
    cards: Vec<Card>,
    flop_dealt: bool,
    turn_dealt: bool,
    river_dealt: bool,
}

impl<'a, D: Deck + ?Sized> Board<'a, D> {
    pub fn new(deck: &'a mut D) -> Self {
        Board {
            deck,
            cards: Vec::with_capacity(5),
            flop_dealt: false,
            turn_dealt: false,
            river_dealt: false,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn flop_dealt(&self) -> bool {
        self.flop_dealt
    }

    pub fn turn_dealt(&self) -> bool {
        self.turn_dealt
    }

    pub fn river_dealt(&self) -> bool {
        self.river_dealt
    }

    pub fn phase(&self) -> BoardPhase {
        match (self.flop_dealt, self.turn_dealt, self.river_dealt) {
            (true, true, true) => BoardPhase::RiverDealt,
            (true, true, false) => BoardPhase::TurnDealt,
            (true, false, false) => BoardPhase::FlopDealt,
            _ => BoardPhase::Empty,
        }
    }

    fn out_of_order(&self, street: &'static str) -> LevelPokerError {
        LevelPokerError::InvalidDealOrder { street, phase: self.phase() }
    }

    /// 发翻牌 (3 张)，只能在 `Empty` 阶段调用
    pub fn deal_flop(&mut self) -> Result<&[Card]> {
        if self.flop_dealt || self.turn_dealt || self.river_dealt {
            return Err(self.out_of_order("flop"));
        }
        let flop = self.deck.deal(3)?;
        self.cards.extend(flop);
        self.flop_dealt = true;
        debug!(board = %CardList(&self.cards), "flop dealt");
        Ok(&self.cards)
    }

    /// 发转牌 (1 张)，只能在 `FlopDealt` 阶段调用
    pub fn deal_turn(&mut self) -> Result<&[Card]> {
        if !self.flop_dealt || self.turn_dealt || self.river_dealt {
            return Err(self.out_of_order("turn"));
        }
        let turn = self.deck.deal(1)?;
        self.cards.extend(turn);
        self.turn_dealt = true;
        debug!(board = %CardList(&self.cards), "turn dealt");
        Ok(&self.cards)
    }

    /// 发河牌 (1 张)，只能在 `TurnDealt` 阶段调用
    pub fn deal_river(&mut self) -> Result<&[Card]> {
        if !self.flop_dealt || !self.turn_dealt || self.river_dealt {
            return Err(self.out_of_order("river"));
        }
        let river = self.deck.deal(1)?;
        self.cards.extend(river);
        self.river_dealt = true;
        debug!(board = %CardList(&self.cards), "river dealt");
        Ok(&self.cards)
    }

    /// 按顺序补齐所有尚未发出的公共牌，最终得到 5 张
    pub fn run_it_once(&mut self) -> Result<&[Card]> {
        if !self.flop_dealt {
            self.deal_flop()?;
        }
        if !self.turn_dealt {
            self.deal_turn()?;
        }
        if !self.river_dealt {
            self.deal_river()?;
        }
        Ok(&self.cards)
    }

    /// 共用已发出的公共牌，发两组独立的剩余牌。暂不支持。
    pub fn run_it_twice(&mut self) -> Result<Vec<Vec<Card>>> {
        Err(LevelPokerError::UnsupportedRunOut { runs: 2 })
    }

    /// 共用已发出的公共牌，发三组独立的剩余牌。暂不支持。
    pub fn run_it_thrice(&mut self) -> Result<Vec<Vec<Card>>> {
        Err(LevelPokerError::UnsupportedRunOut { runs: 3 })
    }
}

/// 日志里把一串牌显示成 `A♠ K♥³ 2♦`
struct CardList<'c>(&'c [Card]);

impl std::fmt::Display for CardList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, card) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{DeckConfig, LevelDeck};

    fn seeded_deck(seed: u64) -> LevelDeck {
        let mut deck = LevelDeck::with_seed(&DeckConfig::default(), seed).unwrap();
        deck.shuffle();
        deck
    }

    #[test]
    fn test_streets_in_order() {
        let mut deck = seeded_deck(1);
        let mut board = Board::new(&mut deck);
        assert_eq!(board.phase(), BoardPhase::Empty);
        assert!(board.cards().is_empty());

        assert_eq!(board.deal_flop().unwrap().len(), 3);
        assert_eq!(board.phase(), BoardPhase::FlopDealt);
        assert_eq!(board.deal_turn().unwrap().len(), 4);
        assert_eq!(board.phase(), BoardPhase::TurnDealt);
        assert_eq!(board.deal_river().unwrap().len(), 5);
        assert_eq!(board.phase(), BoardPhase::RiverDealt);

        assert_eq!(deck.remaining_count(), 47);
    }

    #[test]
    fn test_turn_before_flop_fails() {
        let mut deck = seeded_deck(2);
        let mut board = Board::new(&mut deck);
        assert_eq!(
            board.deal_turn(),
            Err(LevelPokerError::InvalidDealOrder { street: "turn", phase: BoardPhase::Empty })
        );
        assert!(board.cards().is_empty());
        assert!(!board.turn_dealt());
    }

    #[test]
    fn test_river_before_turn_fails() {
        let mut deck = seeded_deck(3);
        let mut board = Board::new(&mut deck);
        assert!(board.deal_river().is_err());
        board.deal_flop().unwrap();
        assert_eq!(
            board.deal_river(),
            Err(LevelPokerError::InvalidDealOrder { street: "river", phase: BoardPhase::FlopDealt })
        );
        assert_eq!(board.cards().len(), 3);
    }

    #[test]
    fn test_streets_cannot_repeat() {
        let mut deck = seeded_deck(4);
        let mut board = Board::new(&mut deck);
        board.deal_flop().unwrap();
        assert!(board.deal_flop().is_err());
        board.deal_turn().unwrap();
        assert!(board.deal_turn().is_err());
        assert!(board.deal_flop().is_err());
        board.deal_river().unwrap();
        assert!(board.deal_river().is_err());
        assert_eq!(board.cards().len(), 5);
    }

    #[test]
    fn test_run_it_once_from_empty() {
        let mut deck = seeded_deck(5);
        let mut board = Board::new(&mut deck);
        assert_eq!(board.run_it_once().unwrap().len(), 5);
        assert!(board.flop_dealt() && board.turn_dealt() && board.river_dealt());
    }

    #[test]
    fn test_run_it_once_after_flop() {
        let mut deck = seeded_deck(6);
        let mut board = Board::new(&mut deck);
        let flop = board.deal_flop().unwrap().to_vec();
        let full = board.run_it_once().unwrap();
        assert_eq!(&full[..3], &flop[..]);
        assert_eq!(full.len(), 5);
        // 已经发完时再调用不会多发牌
        assert_eq!(board.run_it_once().unwrap().len(), 5);
    }

    #[test]
    fn test_multi_run_outs_are_unsupported() {
        let mut deck = seeded_deck(7);
        let mut board = Board::new(&mut deck);
        board.deal_flop().unwrap();
        assert_eq!(board.run_it_twice(), Err(LevelPokerError::UnsupportedRunOut { runs: 2 }));
        assert_eq!(board.run_it_thrice(), Err(LevelPokerError::UnsupportedRunOut { runs: 3 }));
        assert_eq!(board.cards().len(), 3);
    }

    #[test]
    fn test_exhausted_deck_keeps_board_state() {
        let mut deck = seeded_deck(8);
        deck.deal(50).unwrap();
        let mut board = Board::new(&mut deck);
        assert_eq!(
            board.deal_flop(),
            Err(LevelPokerError::DeckExhausted { requested: 3, remaining: 2 })
        );
        assert_eq!(board.phase(), BoardPhase::Empty);
        assert!(board.cards().is_empty());
    }

    #[test]
    fn test_board_over_trait_object() {
        let mut deck = seeded_deck(9);
        let dyn_deck: &mut dyn Deck = &mut deck;
        let mut board = Board::new(dyn_deck);
        assert_eq!(board.run_it_once().unwrap().len(), 5);
    }
}
