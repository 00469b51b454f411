//! Token-reward pools and the award computation.
//!
//! Invariant: for every pool, `minted_supply <= total_supply`. An award is
//! all-or-nothing; it never mints a partial amount to squeeze under the cap.

use std::collections::BTreeMap;

use fanflux_database::basic_db::SafeDatabase;
use fanflux_database::collection::{self, TOKEN_REWARDS, USERS};
use tracing::{debug, info};

use super::{new_id, now, require, Fanflux};
use crate::error::ServiceResult;
use crate::parser::post::Post;
use crate::parser::token::{NewTokenReward, RewardRates, TokenReward};
use crate::parser::user::{Role, User};

/// What a user has done on one creator's posts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interactions {
    pub likes: u64,
    pub comments: u64,
    pub is_follower: bool,
}

impl Interactions {
    pub fn tally(posts: &[Post], creator_address: &str, user: &User) -> Self {
        posts
            .iter()
            .filter(|p| p.creator_address == creator_address)
            .fold(
                Interactions {
                    is_follower: user.role == Role::Follower,
                    ..Default::default()
                },
                |acc, post| Interactions {
                    likes: acc.likes + u64::from(post.is_liked_by(&user.wallet_address)),
                    comments: acc.comments + post.comments_by(&user.wallet_address),
                    is_follower: acc.is_follower,
                },
            )
    }

    /// Saturates rather than wraps; an absurd total simply fails the supply check.
    pub fn payout(&self, rates: &RewardRates) -> u64 {
        let likes = self.likes.saturating_mul(rates.likes.amount);
        let comments = self.comments.saturating_mul(rates.comments.amount);
        let follow = if self.is_follower { rates.followers.amount } else { 0 };
        likes.saturating_add(comments).saturating_add(follow)
    }
}

impl<D: SafeDatabase> Fanflux<D> {
    pub fn create_token_reward(&self, creator_address: &str, data: NewTokenReward) -> ServiceResult<TokenReward> {
        require(creator_address, "Creator address")?;

        let reward = TokenReward {
            id: new_id(),
            creator_address: creator_address.to_string(),
            total_supply: data.total_supply,
            minted_supply: 0,
            created_at: now(),
            rewards: data.rewards,
        };
        collection::save(&self.db, TOKEN_REWARDS, &reward.id, &reward)?;

        info!(
            reward = %reward.id,
            creator = creator_address,
            total_supply = reward.total_supply,
            "created token reward"
        );
        Ok(reward)
    }

    /// Oldest pool first.
    pub fn get_creator_token_rewards(&self, creator_address: &str) -> ServiceResult<Vec<TokenReward>> {
        let mut rewards: Vec<TokenReward> = collection::load_all(&self.db, TOKEN_REWARDS)?;
        rewards.retain(|r| r.creator_address == creator_address);
        rewards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rewards)
    }

    /// Pays `user_address` for its interactions with `creator_address`'s posts out of
    /// the creator's first pool that still has supply. Returns the amount minted, 0 if
    /// nothing was awarded.
    pub fn award_tokens(&self, user_address: &str, creator_address: &str) -> ServiceResult<u64> {
        let _guard = self.exclusive()?;

        let Some(mut user) = self.get_user(user_address)? else {
            debug!(address = user_address, "award skipped, unknown user");
            return Ok(0);
        };

        let Some(mut pool) = self
            .get_creator_token_rewards(creator_address)?
            .into_iter()
            .find(TokenReward::has_supply)
        else {
            debug!(creator = creator_address, "award skipped, no pool with supply");
            return Ok(0);
        };

        let posts = self.get_posts()?;
        let amount = Interactions::tally(&posts, creator_address, &user).payout(&pool.rewards);

        if amount == 0 || amount > pool.remaining() {
            debug!(
                address = user_address,
                creator = creator_address,
                amount,
                remaining = pool.remaining(),
                "award skipped"
            );
            return Ok(0);
        }

        let balance = user.tokens.entry(creator_address.to_string()).or_insert(0);
        *balance = balance.saturating_add(amount);
        pool.minted_supply += amount;

        let ops = vec![
            collection::put_op(USERS, user_address, &user)?,
            collection::put_op(TOKEN_REWARDS, &pool.id, &pool)?,
        ];
        self.db.commit(&ops)?;

        info!(
            address = user_address,
            creator = creator_address,
            amount,
            minted = pool.minted_supply,
            total = pool.total_supply,
            "awarded tokens"
        );
        Ok(amount)
    }

    pub fn get_user_tokens(&self, user_address: &str, creator_address: &str) -> ServiceResult<u64> {
        Ok(self
            .get_user(user_address)?
            .map(|u| u.balance_for(creator_address))
            .unwrap_or(0))
    }

    pub fn get_user_all_tokens(&self, user_address: &str) -> ServiceResult<BTreeMap<String, u64>> {
        Ok(self
            .get_user(user_address)?
            .map(|u| u.tokens)
            .unwrap_or_default())
    }
}
