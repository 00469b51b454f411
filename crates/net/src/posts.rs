use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use fanflux_database::basic_db::SafeDatabase;
use fanflux_service::parser::post::{Comment, FeedPost, Post};
use fanflux_service::Fanflux;

use crate::error::{required, ApiError};

#[derive(Deserialize)]
pub struct PostsQuery {
    creator: Option<String>,
}

#[derive(Deserialize)]
pub struct PostQuery {
    post: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    creator_address: String,
    content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    post_id: String,
    user_address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    post_id: String,
    user_address: String,
    content: String,
}

#[derive(Serialize)]
pub struct PostsResponse {
    posts: Vec<Post>,
}

#[derive(Serialize)]
pub struct FeedResponse {
    posts: Vec<FeedPost>,
}

#[derive(Serialize)]
pub struct CommentsResponse {
    comments: Vec<Comment>,
}

pub async fn create_post<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = store.create_post(&request.creator_address, &request.content)?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// `?creator=` narrows the listing to one creator.
pub async fn get_posts<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<PostsResponse>, ApiError> {
    let posts = match query.creator.as_deref() {
        Some(creator) if !creator.is_empty() => store.get_creator_posts(creator)?,
        _ => store.get_posts()?,
    };
    Ok(Json(PostsResponse { posts }))
}

pub async fn get_feed<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
) -> Result<Json<FeedResponse>, ApiError> {
    Ok(Json(FeedResponse { posts: store.get_feed()? }))
}

pub async fn toggle_like<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Json(request): Json<LikeRequest>,
) -> Result<Json<Post>, ApiError> {
    required(&request.user_address, "User address")?;
    Ok(Json(store.toggle_like(&request.post_id, &request.user_address)?))
}

pub async fn add_comment<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    required(&request.user_address, "User address")?;
    let comment = store.add_comment(&request.post_id, &request.user_address, &request.content)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_comments<T: SafeDatabase>(
    State(store): State<Fanflux<T>>,
    Query(query): Query<PostQuery>,
) -> Result<Json<CommentsResponse>, ApiError> {
    required(&query.post, "Post")?;
    Ok(Json(CommentsResponse { comments: store.get_comments(&query.post)? }))
}
