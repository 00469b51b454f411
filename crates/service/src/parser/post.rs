use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub user_address: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub creator_address: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn is_liked_by(&self, address: &str) -> bool {
        self.likes.iter().any(|a| a == address)
    }

    pub fn comments_by(&self, address: &str) -> u64 {
        self.comments.iter().filter(|c| c.user_address == address).count() as u64
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub user_name: String,
}

/// A post joined with the display names of its creator and commenters.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    pub id: String,
    pub creator_address: String,
    pub creator_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub likes: Vec<String>,
    pub comments: Vec<FeedComment>,
}
