//! Route table

use super::handlers::{
    AppState, contact, create_post, delete_post, featured_posts, get_post, get_post_by_slug,
    get_post_html, get_user, list_posts, list_users, login, logout, me, post_taxonomy,
    posts_by_category, posts_by_tag, register, track_event, track_pageview, update_post,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build the `/api` routes
///
/// - GET  /api/posts, /api/posts/featured, /api/posts/taxonomy
/// - GET  /api/posts/category/{category}, /api/posts/tag/{tag}
/// - GET  /api/posts/slug/{slug}, /api/posts/{id}, /api/posts/{id}/html
/// - POST /api/posts, PUT|DELETE /api/posts/{id} (admin)
/// - GET  /api/users, /api/users/{id}
/// - POST /api/auth/login|register|logout, GET /api/auth/me
/// - POST /api/analytics/pageview|event, POST /api/contact
pub fn build_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/featured", get(featured_posts))
        .route("/api/posts/taxonomy", get(post_taxonomy))
        .route("/api/posts/category/{category}", get(posts_by_category))
        .route("/api/posts/tag/{tag}", get(posts_by_tag))
        .route("/api/posts/slug/{slug}", get(get_post_by_slug))
        .route(
            "/api/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/posts/{id}/html", get(get_post_html))
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", get(get_user))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route("/api/analytics/pageview", post(track_pageview))
        .route("/api/analytics/event", post(track_event))
        .route("/api/contact", post(contact))
        .with_state(state)
}
