use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Creator,
    Follower,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub wallet_address: String,
    pub role: Role,
    pub name: String,
    pub bio: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tokens: BTreeMap<String, u64>,     // creator address -> balance
    #[serde(default)]
    pub subscriptions: Vec<String>,        // community ids
}

/// Profile fields supplied at registration. Anything missing is left empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub bio: String,
    pub interests: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub interests: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl User {
    pub fn balance_for(&self, creator_address: &str) -> u64 {
        self.tokens.get(creator_address).copied().unwrap_or(0)
    }

    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
        if let Some(interests) = patch.interests {
            self.interests = interests;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }
}
