use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub community_id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub price: u64,                        // in the creator's tokens
    pub created_at: DateTime<Utc>,
    pub creator_address: String,
    pub image_url: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub content: String,
    pub price: u64,
    pub image_url: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub price: Option<u64>,
    pub image_url: Option<String>,
}

impl Article {
    pub fn apply(&mut self, patch: ArticlePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
    }
}
