use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAmount {
    #[serde(default)]
    pub amount: u64,
}

/// Tokens paid per like, per comment, and once for holding the follower role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardRates {
    pub likes: RewardAmount,
    pub comments: RewardAmount,
    pub followers: RewardAmount,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReward {
    pub id: String,
    pub creator_address: String,
    pub total_supply: u64,
    pub minted_supply: u64,
    pub created_at: DateTime<Utc>,
    pub rewards: RewardRates,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTokenReward {
    pub total_supply: u64,
    pub rewards: RewardRates,
}

impl TokenReward {
    pub fn remaining(&self) -> u64 {
        self.total_supply.saturating_sub(self.minted_supply)
    }

    pub fn has_supply(&self) -> bool {
        self.minted_supply < self.total_supply
    }
}
