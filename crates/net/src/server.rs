use axum::{http, Json, Router};
use crate::router::*;
use crate::users::*;
use crate::posts::*;
use crate::tokens::*;
use crate::community::*;
use crate::marketplace::*;
use crate::config::ServerConfig;
use fanflux_database::basic_db::SafeDatabase;
use fanflux_service::Fanflux;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub async fn build_server<T: SafeDatabase>(store: Fanflux<T>, config: &ServerConfig) -> std::io::Result<()> {
    let app = build_app(store);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(address = %listener.local_addr()?, "fanflux listening");

    axum::serve(listener, app).await
}

/// The full API with CORS and request tracing applied.
pub fn build_app<T: SafeDatabase>(store: Fanflux<T>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::OPTIONS
        ])
        .allow_headers(Any)
        .allow_credentials(false);

    main_router(collect_components::<T>(), store)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}


fn collect_components<T: SafeDatabase>() -> Vec<(String, Router<Fanflux<T>>)> {
    vec![
        get_router_builder("/health".to_string(), health),

        // users
        post_router_builder("/api/user".to_string(), register_user::<T>),
        get_router_builder("/api/user".to_string(), get_user::<T>),
        put_router_builder("/api/user".to_string(), update_user::<T>),
        get_router_builder("/api/creators".to_string(), get_creators::<T>),
        get_router_builder("/api/followers".to_string(), get_followers::<T>),
        post_router_builder("/api/subscription".to_string(), subscribe::<T>),
        delete_router_builder("/api/subscription".to_string(), unsubscribe::<T>),
        get_router_builder("/api/subscription".to_string(), is_subscribed::<T>),
        get_router_builder("/api/subscriptions".to_string(), get_subscriptions::<T>),

        // posts
        post_router_builder("/api/post".to_string(), create_post::<T>),
        get_router_builder("/api/posts".to_string(), get_posts::<T>),
        get_router_builder("/api/feed".to_string(), get_feed::<T>),
        post_router_builder("/api/post/like".to_string(), toggle_like::<T>),
        post_router_builder("/api/post/comment".to_string(), add_comment::<T>),
        get_router_builder("/api/post/comments".to_string(), get_comments::<T>),

        // tokens
        post_router_builder("/api/token/reward".to_string(), create_token_reward::<T>),
        get_router_builder("/api/token/rewards".to_string(), get_creator_token_rewards::<T>),
        post_router_builder("/api/token/award".to_string(), award_tokens::<T>),
        get_router_builder("/api/token/balance".to_string(), get_user_tokens::<T>),
        get_router_builder("/api/token/balances".to_string(), get_user_all_tokens::<T>),

        // communities
        post_router_builder("/api/community".to_string(), save_community::<T>),
        get_router_builder("/api/community".to_string(), get_community::<T>),
        put_router_builder("/api/community".to_string(), update_community::<T>),
        delete_router_builder("/api/community".to_string(), delete_community::<T>),
        get_router_builder("/api/community/creator".to_string(), get_creator_community::<T>),
        get_router_builder("/api/communities".to_string(), get_all_communities::<T>),

        // marketplace
        post_router_builder("/api/article".to_string(), create_article::<T>),
        get_router_builder("/api/article".to_string(), get_article::<T>),
        put_router_builder("/api/article".to_string(), update_article::<T>),
        delete_router_builder("/api/article".to_string(), delete_article::<T>),
        get_router_builder("/api/articles".to_string(), get_community_articles::<T>),
        post_router_builder("/api/article/purchase".to_string(), purchase_article::<T>),
    ]
}
