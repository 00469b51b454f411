use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use fanflux_database::basic_db::SafeDatabase;
use fanflux_service::parser::community::{Community, CommunityPatch, NewCommunity};
use fanflux_service::Fanflux;

use crate::error::{required, ApiError};

#[derive(Deserialize)]
pub struct IdQuery {
    id: String,
}

#[derive(Deserialize)]
pub struct CreatorQuery {
    creator: String,
}

#[derive(Serialize)]
pub struct CommunitiesResponse {
    communities: Vec<Community>,
}

pub async fn save_community<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<CreatorQuery>,
    Json(data): Json<NewCommunity>,
) -> Result<(StatusCode, Json<Community>), ApiError> {
    required(&query.creator, "Creator")?;
    let community = store.create_community(&query.creator, data)?;
    Ok((StatusCode::CREATED, Json(community)))
}

pub async fn get_community<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Community>, ApiError> {
    required(&query.id, "Community id")?;

    store
        .get_community(&query.id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Community not found".to_string()))
}

pub async fn get_creator_community<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<CreatorQuery>,
) -> Result<Json<Community>, ApiError> {
    required(&query.creator, "Creator")?;

    store
        .get_creator_community(&query.creator)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Community not found".to_string()))
}

pub async fn update_community<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<IdQuery>,
    Json(patch): Json<CommunityPatch>,
) -> Result<Json<Community>, ApiError> {
    required(&query.id, "Community id")?;
    Ok(Json(store.update_community(&query.id, patch)?))
}

pub async fn delete_community<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<IdQuery>,
) -> Result<StatusCode, ApiError> {
    required(&query.id, "Community id")?;
    store.delete_community(&query.id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_all_communities<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
) -> Result<Json<CommunitiesResponse>, ApiError> {
    Ok(Json(CommunitiesResponse {
        communities: store.get_all_communities()?,
    }))
}


#[cfg(test)]
mod tests {
    use super::*;
    use fanflux_database::basic_db::InnerDatabase;
    use tempfile::tempdir;

    fn creator(address: &str) -> Query<CreatorQuery> {
        Query(CreatorQuery { creator: address.to_string() })
    }

    fn by_id(id: &str) -> Query<IdQuery> {
        Query(IdQuery { id: id.to_string() })
    }

    #[tokio::test]
    async fn test_save_and_get_community() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let store = Fanflux::new(InnerDatabase::new(temp_dir.path().join("test_db"))?);

        let data = NewCommunity {
            name: "Pixels".to_string(),
            description: "generative art".to_string(),
            tags: vec!["art".to_string()],
        };
        let (status, Json(created)) = save_community(State(store.clone()), creator("0xc"), Json(data)).await?;
        assert_eq!(status, StatusCode::CREATED);

        let Json(fetched) = get_community(State(store.clone()), by_id(&created.id)).await?;
        assert_eq!(fetched.name, "Pixels");

        let Json(owned) = get_creator_community(State(store.clone()), creator("0xc")).await?;
        assert_eq!(owned.id, created.id);

        let Json(all) = get_all_communities(State(store)).await?;
        assert_eq!(all.communities.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_community() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let store = Fanflux::new(InnerDatabase::new(temp_dir.path().join("test_db"))?);
        let created = store.create_community("0xc", NewCommunity::default())?;

        let patch = CommunityPatch {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let Json(updated) = update_community(State(store.clone()), by_id(&created.id), Json(patch)).await?;
        assert_eq!(updated.name, "Renamed");

        let status = delete_community(State(store.clone()), by_id(&created.id)).await?;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let again = delete_community(State(store.clone()), by_id(&created.id)).await;
        match again {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "Community not found"),
            _ => return Err("Expected NotFound with 'Community not found' message".into()),
        }

        match get_community(State(store.clone()), by_id(&created.id)).await {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "Community not found"),
            _ => return Err("Expected NotFound with 'Community not found' message".into()),
        }

        match get_creator_community(State(store), creator("0xc")).await {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "Community not found"),
            _ => return Err("Expected NotFound with 'Community not found' message".into()),
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_id_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let store = Fanflux::new(InnerDatabase::new(temp_dir.path().join("test_db"))?);

        let result = get_community(State(store), by_id("")).await;
        match result {
            Err(ApiError::ValidationError(msg)) => {
                assert_eq!(msg, "Community id is required");
                Ok(())
            },
            _ => Err("Expected ValidationError with 'Community id is required' message".into()),
        }
    }
}
