//! Articles sold for a creator's tokens.
//!
//! A purchase only ever lowers the buyer's balance for the article's creator,
//! and never below zero.

use fanflux_database::basic_db::SafeDatabase;
use fanflux_database::collection::{self, ARTICLES, USERS};
use tracing::{debug, info};

use super::{new_id, now, require, Fanflux};
use crate::error::{ServiceError, ServiceResult};
use crate::parser::article::{Article, ArticlePatch, NewArticle};

impl<D: SafeDatabase> Fanflux<D> {
    pub fn create_article(&self, community_id: &str, creator_address: &str, data: NewArticle) -> ServiceResult<Article> {
        require(community_id, "Community id")?;
        require(creator_address, "Creator address")?;

        let article = Article {
            id: new_id(),
            community_id: community_id.to_string(),
            title: data.title,
            description: data.description,
            content: data.content,
            price: data.price,
            created_at: now(),
            creator_address: creator_address.to_string(),
            image_url: data.image_url,
        };
        collection::save(&self.db, ARTICLES, &article.id, &article)?;

        info!(article = %article.id, community = community_id, price = article.price, "created article");
        Ok(article)
    }

    pub fn get_community_articles(&self, community_id: &str) -> ServiceResult<Vec<Article>> {
        let mut articles: Vec<Article> = collection::load_all(&self.db, ARTICLES)?;
        articles.retain(|a| a.community_id == community_id);
        articles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(articles)
    }

    pub fn get_article(&self, id: &str) -> ServiceResult<Option<Article>> {
        Ok(collection::load(&self.db, ARTICLES, id)?)
    }

    /// Returns `false` when the article or user is unknown, or when the user's
    /// balance for the article's creator is zero or below the price.
    pub fn purchase_article(&self, article_id: &str, user_address: &str) -> ServiceResult<bool> {
        let _guard = self.exclusive()?;

        let Some(article) = self.get_article(article_id)? else {
            debug!(article = article_id, "purchase rejected, unknown article");
            return Ok(false);
        };
        let Some(mut user) = self.get_user(user_address)? else {
            debug!(address = user_address, "purchase rejected, unknown user");
            return Ok(false);
        };

        let balance = user.balance_for(&article.creator_address);
        if balance == 0 || balance < article.price {
            debug!(
                article = article_id,
                address = user_address,
                balance,
                price = article.price,
                "purchase rejected, insufficient tokens"
            );
            return Ok(false);
        }

        user.tokens
            .insert(article.creator_address.clone(), balance - article.price);
        collection::save(&self.db, USERS, user_address, &user)?;

        info!(
            article = article_id,
            address = user_address,
            price = article.price,
            remaining = balance - article.price,
            "article purchased"
        );
        Ok(true)
    }

    pub fn update_article(&self, id: &str, patch: ArticlePatch) -> ServiceResult<Article> {
        let _guard = self.exclusive()?;

        let mut article: Article = collection::load(&self.db, ARTICLES, id)?
            .ok_or_else(|| ServiceError::NotFound("Article not found".to_string()))?;
        article.apply(patch);
        collection::save(&self.db, ARTICLES, id, &article)?;

        info!(article = id, "updated article");
        Ok(article)
    }

    pub fn delete_article(&self, id: &str) -> ServiceResult<()> {
        let _guard = self.exclusive()?;

        if !collection::remove(&self.db, ARTICLES, id)? {
            return Err(ServiceError::NotFound("Article not found".to_string()));
        }

        info!(article = id, "deleted article");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::open_store;
    use crate::parser::token::{NewTokenReward, RewardAmount, RewardRates};
    use crate::parser::user::{Role, UserProfile};

    fn article(title: &str, price: u64) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            price,
            ..Default::default()
        }
    }

    /// Registers `0xfan` and gives it `amount` tokens from `0xc` through a follower award.
    fn fund(store: &Fanflux<impl SafeDatabase>, amount: u64) {
        store.register_user("0xfan", Role::Follower, UserProfile::default()).unwrap();
        let rewards = RewardRates {
            followers: RewardAmount { amount },
            ..Default::default()
        };
        store
            .create_token_reward("0xc", NewTokenReward { total_supply: 10_000, rewards })
            .unwrap();
        assert_eq!(store.award_tokens("0xfan", "0xc").unwrap(), amount);
    }

    #[test]
    fn test_article_crud() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, store) = open_store();

        let created = store.create_article("c1", "0xc", article("Masterclass", 150))?;
        store.create_article("c2", "0xc", article("Elsewhere", 10))?;

        assert_eq!(store.get_article(&created.id)?, Some(created.clone()));
        let listed = store.get_community_articles("c1")?;
        assert_eq!(listed, vec![created.clone()]);

        let patch = ArticlePatch {
            price: Some(120),
            ..Default::default()
        };
        let updated = store.update_article(&created.id, patch)?;
        assert_eq!(updated.price, 120);
        assert_eq!(updated.title, "Masterclass");

        store.delete_article(&created.id)?;
        assert!(store.get_article(&created.id)?.is_none());

        match store.delete_article(&created.id) {
            Err(ServiceError::NotFound(msg)) => assert_eq!(msg, "Article not found"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            store.update_article("missing", ArticlePatch::default()),
            Err(ServiceError::NotFound(_))
        ));

        Ok(())
    }

    #[test]
    fn test_purchase_deducts_price() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, store) = open_store();
        fund(&store, 100);
        let item = store.create_article("c1", "0xc", article("Templates", 60))?;

        assert!(store.purchase_article(&item.id, "0xfan")?);
        assert_eq!(store.get_user_tokens("0xfan", "0xc")?, 40);

        // 40 left, price 60
        assert!(!store.purchase_article(&item.id, "0xfan")?);
        assert_eq!(store.get_user_tokens("0xfan", "0xc")?, 40);

        Ok(())
    }

    #[test]
    fn test_purchase_exact_balance() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, store) = open_store();
        fund(&store, 75);
        let item = store.create_article("c1", "0xc", article("Membership", 75))?;

        assert!(store.purchase_article(&item.id, "0xfan")?);
        assert_eq!(store.get_user_tokens("0xfan", "0xc")?, 0);

        Ok(())
    }

    #[test]
    fn test_concurrent_purchases_cannot_overspend() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, store) = open_store();
        fund(&store, 50);
        let item = store.create_article("c1", "0xc", article("Templates", 30))?;

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = store.clone();
                let article_id = item.id.clone();
                std::thread::spawn(move || store.purchase_article(&article_id, "0xfan"))
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            if handle.join().expect("purchase thread panicked")? {
                succeeded += 1;
            }
        }

        // 50 covers one 30-token purchase
        assert_eq!(succeeded, 1);
        assert_eq!(store.get_user_tokens("0xfan", "0xc")?, 20);

        Ok(())
    }

    #[test]
    fn test_purchase_rejections() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, store) = open_store();
        fund(&store, 50);
        let other_creator = store.create_article("c9", "0xother", article("Not yours", 1))?;
        let free = store.create_article("c1", "0xother", article("Free", 0))?;

        assert!(!store.purchase_article("missing", "0xfan")?);
        assert!(!store.purchase_article(&other_creator.id, "0xghost")?);
        // tokens are per creator; 0xfan holds none of 0xother's
        assert!(!store.purchase_article(&other_creator.id, "0xfan")?);
        assert!(!store.purchase_article(&free.id, "0xfan")?);
        assert_eq!(store.get_user_tokens("0xfan", "0xc")?, 50);

        Ok(())
    }
}
