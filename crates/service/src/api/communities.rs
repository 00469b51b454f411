use fanflux_database::basic_db::SafeDatabase;
use fanflux_database::collection::{self, COMMUNITIES};
use tracing::info;

use super::{new_id, now, require, Fanflux};
use crate::error::{ServiceError, ServiceResult};
use crate::parser::community::{Community, CommunityPatch, NewCommunity};

impl<D: SafeDatabase> Fanflux<D> {
    pub fn create_community(&self, creator_address: &str, data: NewCommunity) -> ServiceResult<Community> {
        require(creator_address, "Creator address")?;

        let community = Community {
            id: new_id(),
            name: data.name,
            description: data.description,
            creator_address: creator_address.to_string(),
            created_at: now(),
            tags: data.tags,
            followers: Vec::new(),
        };
        collection::save(&self.db, COMMUNITIES, &community.id, &community)?;

        info!(community = %community.id, creator = creator_address, "created community");
        Ok(community)
    }

    /// The creator's oldest community, if any.
    pub fn get_creator_community(&self, creator_address: &str) -> ServiceResult<Option<Community>> {
        Ok(self
            .get_all_communities()?
            .into_iter()
            .find(|c| c.creator_address == creator_address))
    }

    pub fn get_community(&self, id: &str) -> ServiceResult<Option<Community>> {
        Ok(collection::load(&self.db, COMMUNITIES, id)?)
    }

    pub fn update_community(&self, id: &str, patch: CommunityPatch) -> ServiceResult<Community> {
        let _guard = self.exclusive()?;

        let mut community: Community = collection::load(&self.db, COMMUNITIES, id)?
            .ok_or_else(|| ServiceError::NotFound("Community not found".to_string()))?;
        community.apply(patch);
        collection::save(&self.db, COMMUNITIES, id, &community)?;

        info!(community = id, "updated community");
        Ok(community)
    }

    pub fn delete_community(&self, id: &str) -> ServiceResult<()> {
        let _guard = self.exclusive()?;

        if !collection::remove(&self.db, COMMUNITIES, id)? {
            return Err(ServiceError::NotFound("Community not found".to_string()));
        }

        info!(community = id, "deleted community");
        Ok(())
    }

    /// Oldest first.
    pub fn get_all_communities(&self) -> ServiceResult<Vec<Community>> {
        let mut communities: Vec<Community> = collection::load_all(&self.db, COMMUNITIES)?;
        communities.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(communities)
    }
}
