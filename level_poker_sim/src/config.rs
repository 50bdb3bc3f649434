use level_poker_core::DeckConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::SimError;

/// 模拟器配置，可以从 JSON 文件读取，缺省的字段使用默认值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// 模拟的局数
    pub rounds: u64,
    /// 每局的玩家数，每人两张底牌
    pub players: usize,
    /// 第 i 局的牌堆使用 seed + i 作为种子
    pub seed: u64,
    pub deck: DeckConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rounds: 10_000,
            players: 2,
            seed: 42,
            deck: DeckConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        let config: SimConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.rounds == 0 {
            return Err(SimError::Config("rounds must be > 0".into()));
        }
        // 5 张公共牌之外，每位玩家需要 2 张
        let max_players = (self.deck.kind.size() - 5) / 2;
        if self.players == 0 || self.players > max_players {
            return Err(SimError::Config(format!(
                "players must be in 1..={} for a {:?} deck",
                max_players, self.deck.kind
            )));
        }
        self.deck.validate()?;
        Ok(())
    }
}
