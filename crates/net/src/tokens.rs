use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use fanflux_database::basic_db::SafeDatabase;
use fanflux_service::parser::token::{NewTokenReward, TokenReward};
use fanflux_service::Fanflux;

use crate::error::{required, ApiError};

#[derive(Deserialize)]
pub struct CreatorQuery {
    creator: String,
}

#[derive(Deserialize)]
pub struct BalanceQuery {
    user: String,
    creator: String,
}

#[derive(Deserialize)]
pub struct UserQuery {
    user: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardRequest {
    user_address: String,
    creator_address: String,
}

#[derive(Serialize)]
pub struct RewardsResponse {
    rewards: Vec<TokenReward>,
}

#[derive(Serialize)]
pub struct AwardResponse {
    awarded: u64,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    balance: u64,
}

#[derive(Serialize)]
pub struct BalancesResponse {
    tokens: BTreeMap<String, u64>,
}

pub async fn create_token_reward<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<CreatorQuery>,
    Json(data): Json<NewTokenReward>,
) -> Result<(StatusCode, Json<TokenReward>), ApiError> {
    required(&query.creator, "Creator")?;
    let reward = store.create_token_reward(&query.creator, data)?;
    Ok((StatusCode::CREATED, Json(reward)))
}

pub async fn get_creator_token_rewards<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<CreatorQuery>,
) -> Result<Json<RewardsResponse>, ApiError> {
    required(&query.creator, "Creator")?;
    Ok(Json(RewardsResponse {
        rewards: store.get_creator_token_rewards(&query.creator)?,
    }))
}

pub async fn award_tokens<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Json(request): Json<AwardRequest>,
) -> Result<Json<AwardResponse>, ApiError> {
    required(&request.user_address, "User address")?;
    required(&request.creator_address, "Creator address")?;
    let awarded = store.award_tokens(&request.user_address, &request.creator_address)?;
    Ok(Json(AwardResponse { awarded }))
}

pub async fn get_user_tokens<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = store.get_user_tokens(&query.user, &query.creator)?;
    Ok(Json(BalanceResponse { balance }))
}

pub async fn get_user_all_tokens<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<BalancesResponse>, ApiError> {
    Ok(Json(BalancesResponse {
        tokens: store.get_user_all_tokens(&query.user)?,
    }))
}
