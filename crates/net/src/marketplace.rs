use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use fanflux_database::basic_db::SafeDatabase;
use fanflux_service::parser::article::{Article, ArticlePatch, NewArticle};
use fanflux_service::Fanflux;

use crate::error::{required, ApiError};

#[derive(Deserialize)]
pub struct IdQuery {
    id: String,
}

#[derive(Deserialize)]
pub struct CommunityQuery {
    community: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    community_id: String,
    creator_address: String,
    #[serde(flatten)]
    article: NewArticle,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    article_id: String,
    user_address: String,
}

#[derive(Serialize)]
pub struct ArticlesResponse {
    articles: Vec<Article>,
}

#[derive(Serialize)]
pub struct PurchaseResponse {
    success: bool,
}

pub async fn create_article<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Json(request): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let article = store.create_article(&request.community_id, &request.creator_address, request.article)?;
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn get_community_articles<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<CommunityQuery>,
) -> Result<Json<ArticlesResponse>, ApiError> {
    required(&query.community, "Community")?;
    Ok(Json(ArticlesResponse {
        articles: store.get_community_articles(&query.community)?,
    }))
}

pub async fn get_article<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Article>, ApiError> {
    required(&query.id, "Article id")?;

    store
        .get_article(&query.id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Article not found".to_string()))
}

/// A rejected purchase is not an error: it answers `{"success": false}`.
pub async fn purchase_article<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Json(request): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let success = store.purchase_article(&request.article_id, &request.user_address)?;
    Ok(Json(PurchaseResponse { success }))
}

pub async fn update_article<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<IdQuery>,
    Json(patch): Json<ArticlePatch>,
) -> Result<Json<Article>, ApiError> {
    required(&query.id, "Article id")?;
    Ok(Json(store.update_article(&query.id, patch)?))
}

pub async fn delete_article<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<IdQuery>,
) -> Result<StatusCode, ApiError> {
    required(&query.id, "Article id")?;
    store.delete_article(&query.id)?;
    Ok(StatusCode::NO_CONTENT)
}


#[cfg(test)]
mod tests {
    use super::*;
    use fanflux_database::basic_db::InnerDatabase;
    use fanflux_service::parser::token::{NewTokenReward, RewardAmount, RewardRates};
    use fanflux_service::parser::user::{Role, UserProfile};
    use tempfile::tempdir;

    fn article_request(price: u64) -> CreateArticleRequest {
        CreateArticleRequest {
            community_id: "c1".to_string(),
            creator_address: "0xc".to_string(),
            article: NewArticle {
                title: "Masterclass".to_string(),
                price,
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_create_list_update_delete() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let store = Fanflux::new(InnerDatabase::new(temp_dir.path().join("test_db"))?);

        let (status, Json(created)) = create_article(State(store.clone()), Json(article_request(150))).await?;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.community_id, "c1");

        let Json(listed) = get_community_articles(
            State(store.clone()),
            Query(CommunityQuery { community: "c1".to_string() }),
        )
        .await?;
        assert_eq!(listed.articles.len(), 1);

        let patch = ArticlePatch {
            title: Some("Advanced".to_string()),
            ..Default::default()
        };
        let Json(updated) = update_article(State(store.clone()), Query(IdQuery { id: created.id.clone() }), Json(patch)).await?;
        assert_eq!(updated.title, "Advanced");
        assert_eq!(updated.price, 150);

        delete_article(State(store.clone()), Query(IdQuery { id: created.id.clone() })).await?;
        let missing = get_article(State(store), Query(IdQuery { id: created.id })).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_purchase() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempdir()?;
        let store = Fanflux::new(InnerDatabase::new(temp_dir.path().join("test_db"))?);
        store.register_user("0xfan", Role::Follower, UserProfile::default())?;
        store.create_token_reward(
            "0xc",
            NewTokenReward {
                total_supply: 100,
                rewards: RewardRates {
                    followers: RewardAmount { amount: 80 },
                    ..Default::default()
                },
            },
        )?;
        store.award_tokens("0xfan", "0xc")?;

        let (_, Json(article)) = create_article(State(store.clone()), Json(article_request(50))).await?;
        let purchase = || PurchaseRequest {
            article_id: article.id.clone(),
            user_address: "0xfan".to_string(),
        };

        let Json(first) = purchase_article(State(store.clone()), Json(purchase())).await?;
        assert!(first.success);
        let Json(second) = purchase_article(State(store.clone()), Json(purchase())).await?;
        assert!(!second.success);

        assert_eq!(store.get_user_tokens("0xfan", "0xc")?, 30);

        Ok(())
    }
}
