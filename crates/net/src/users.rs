use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use fanflux_database::basic_db::SafeDatabase;
use fanflux_service::parser::user::{Role, User, UserPatch, UserProfile};
use fanflux_service::Fanflux;

use crate::error::{required, ApiError};

#[derive(Deserialize)]
pub struct AddressQuery {
    address: String,
}

#[derive(Deserialize)]
pub struct SubscriptionQuery {
    address: String,
    community: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    wallet_address: String,
    role: Role,
    #[serde(flatten)]
    profile: UserProfile,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    user_address: String,
    community_id: String,
}

#[derive(Serialize)]
pub struct UsersResponse {
    users: Vec<User>,
}

#[derive(Serialize)]
pub struct SubscribedResponse {
    subscribed: bool,
}

#[derive(Serialize)]
pub struct SubscriptionsResponse {
    subscriptions: Vec<String>,
}

pub async fn register_user<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = store.register_user(&request.wallet_address, request.role, request.profile)?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<AddressQuery>,
) -> Result<Json<User>, ApiError> {
    required(&query.address, "Address")?;

    store
        .get_user(&query.address)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

pub async fn update_user<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<AddressQuery>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, ApiError> {
    required(&query.address, "Address")?;
    Ok(Json(store.update_user(&query.address, patch)?))
}

pub async fn get_creators<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
) -> Result<Json<UsersResponse>, ApiError> {
    Ok(Json(UsersResponse { users: store.get_creators()? }))
}

pub async fn get_followers<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
) -> Result<Json<UsersResponse>, ApiError> {
    Ok(Json(UsersResponse { users: store.get_followers()? }))
}

pub async fn subscribe<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<User>, ApiError> {
    required(&request.user_address, "User address")?;
    Ok(Json(store.subscribe_to_community(&request.user_address, &request.community_id)?))
}

pub async fn unsubscribe<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<SubscriptionQuery>,
) -> Result<Json<User>, ApiError> {
    required(&query.address, "Address")?;
    required(&query.community, "Community")?;
    Ok(Json(store.unsubscribe_from_community(&query.address, &query.community)?))
}

pub async fn is_subscribed<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<SubscriptionQuery>,
) -> Result<Json<SubscribedResponse>, ApiError> {
    let subscribed = store.is_subscribed_to_community(&query.address, &query.community)?;
    Ok(Json(SubscribedResponse { subscribed }))
}

pub async fn get_subscriptions<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<AddressQuery>,
) -> Result<Json<SubscriptionsResponse>, ApiError> {
    required(&query.address, "Address")?;
    Ok(Json(SubscriptionsResponse {
        subscriptions: store.get_user_subscriptions(&query.address)?,
    }))
}
