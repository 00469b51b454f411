use fanflux_database::basic_db::SafeDatabase;
use fanflux_database::collection::{self, COMMUNITIES, USERS};
use tracing::{debug, info};

use super::{now, require, Fanflux};
use crate::error::{ServiceError, ServiceResult};
use crate::parser::community::Community;
use crate::parser::user::{Role, User, UserPatch, UserProfile};

impl<D: SafeDatabase> Fanflux<D> {
    pub fn register_user(
        &self,
        wallet_address: &str,
        role: Role,
        profile: UserProfile,
    ) -> ServiceResult<User> {
        require(wallet_address, "Wallet address")?;
        let _guard = self.exclusive()?;

        if collection::load::<User, _>(&self.db, USERS, wallet_address)?.is_some() {
            return Err(ServiceError::AlreadyExists("User already exists".to_string()));
        }

        let user = User {
            wallet_address: wallet_address.to_string(),
            role,
            name: profile.name,
            bio: profile.bio,
            interests: profile.interests,
            tags: profile.tags,
            created_at: now(),
            tokens: Default::default(),
            subscriptions: Vec::new(),
        };
        collection::save(&self.db, USERS, wallet_address, &user)?;

        info!(address = wallet_address, role = ?role, "registered user");
        Ok(user)
    }

    pub fn update_user(&self, wallet_address: &str, patch: UserPatch) -> ServiceResult<User> {
        let _guard = self.exclusive()?;

        let mut user = self.load_user(wallet_address)?;
        user.apply(patch);
        collection::save(&self.db, USERS, wallet_address, &user)?;

        debug!(address = wallet_address, "updated user profile");
        Ok(user)
    }

    pub fn get_user(&self, wallet_address: &str) -> ServiceResult<Option<User>> {
        Ok(collection::load(&self.db, USERS, wallet_address)?)
    }

    pub fn get_creators(&self) -> ServiceResult<Vec<User>> {
        self.users_with_role(Role::Creator)
    }

    pub fn get_followers(&self) -> ServiceResult<Vec<User>> {
        self.users_with_role(Role::Follower)
    }

    /// Idempotent. The community's follower list is kept in step when the community exists.
    pub fn subscribe_to_community(&self, user_address: &str, community_id: &str) -> ServiceResult<User> {
        require(community_id, "Community id")?;
        let _guard = self.exclusive()?;

        let mut user = self.load_user(user_address)?;
        let mut ops = Vec::new();

        if !user.subscriptions.iter().any(|id| id == community_id) {
            user.subscriptions.push(community_id.to_string());
            ops.push(collection::put_op(USERS, user_address, &user)?);
        }

        if let Some(mut community) = collection::load::<Community, _>(&self.db, COMMUNITIES, community_id)? {
            if !community.followers.iter().any(|a| a == user_address) {
                community.followers.push(user_address.to_string());
                ops.push(collection::put_op(COMMUNITIES, community_id, &community)?);
            }
        }

        if !ops.is_empty() {
            self.db.commit(&ops)?;
            info!(address = user_address, community = community_id, "subscribed");
        }
        Ok(user)
    }

    pub fn unsubscribe_from_community(&self, user_address: &str, community_id: &str) -> ServiceResult<User> {
        let _guard = self.exclusive()?;

        let mut user = self.load_user(user_address)?;
        user.subscriptions.retain(|id| id != community_id);
        let mut ops = vec![collection::put_op(USERS, user_address, &user)?];

        if let Some(mut community) = collection::load::<Community, _>(&self.db, COMMUNITIES, community_id)? {
            let before = community.followers.len();
            community.followers.retain(|a| a != user_address);
            if community.followers.len() != before {
                ops.push(collection::put_op(COMMUNITIES, community_id, &community)?);
            }
        }

        self.db.commit(&ops)?;
        info!(address = user_address, community = community_id, "unsubscribed");
        Ok(user)
    }

    pub fn is_subscribed_to_community(&self, user_address: &str, community_id: &str) -> ServiceResult<bool> {
        Ok(self
            .get_user(user_address)?
            .map(|u| u.subscriptions.iter().any(|id| id == community_id))
            .unwrap_or(false))
    }

    pub fn get_user_subscriptions(&self, user_address: &str) -> ServiceResult<Vec<String>> {
        Ok(self
            .get_user(user_address)?
            .map(|u| u.subscriptions)
            .unwrap_or_default())
    }

    pub(crate) fn load_user(&self, wallet_address: &str) -> ServiceResult<User> {
        collection::load(&self.db, USERS, wallet_address)?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    pub(crate) fn all_users(&self) -> ServiceResult<Vec<User>> {
        let mut users: Vec<User> = collection::load_all(&self.db, USERS)?;
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.wallet_address.cmp(&b.wallet_address))
        });
        Ok(users)
    }

    fn users_with_role(&self, role: Role) -> ServiceResult<Vec<User>> {
        Ok(self
            .all_users()?
            .into_iter()
            .filter(|u| u.role == role)
            .collect())
    }
}
