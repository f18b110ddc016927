//! HTTP handlers
//!
//! Listing endpoints load the full collection from the data service and run
//! the listing pipeline over it per request, so every response reflects the
//! stored state at that moment.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

use crate::config::{AppConfig, ListingConfig};
use crate::core::auth::{self, AuthDirectory, AuthUser, LoginCredentials, RegisterData, Role, SessionRegistry};
use crate::core::{BlogError, DataService, Page, QueryParams, Result, render_rich_text};
use crate::entities::post::{self, DEFAULT_RELATED_LIMIT, NewPost, Post, PostPatch};
use crate::entities::PublicUser;
use crate::listing::{Listable, Listing};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn DataService<Post>>,
    pub users: Arc<dyn DataService<PublicUser>>,
    pub auth: Arc<AuthDirectory>,
    pub sessions: Arc<SessionRegistry>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Resolve the bearer token of a request, if any
    pub fn current_user(&self, headers: &HeaderMap) -> Result<Option<AuthUser>> {
        match bearer_token(headers) {
            Some(token) => self.sessions.resolve(token),
            None => Ok(None),
        }
    }

    fn require_admin(&self, headers: &HeaderMap) -> Result<AuthUser> {
        let user = self.current_user(headers)?;
        auth::require(user.as_ref(), &[Role::Admin])
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Run the listing pipeline over a freshly loaded collection
pub fn run_listing<T: Listable>(entities: Vec<T>, params: &QueryParams, bounds: ListingConfig) -> Page<T> {
    let mut listing = Listing::with_limit(params.limit(bounds.page_size, bounds.max_page_size));
    listing.replace_entities(entities);
    listing.set_search(params.search.trim());

    for (selector, value) in [
        ("category", &params.category),
        ("tag", &params.tag),
        ("role", &params.role),
    ] {
        if !value.is_empty() {
            listing.set_filter(selector, value.as_str());
        }
    }
    if let Some(sort) = &params.sort {
        listing.set_sort_by(sort.as_str());
    }
    listing.set_page(params.page());
    listing.view()
}

/// Generic acknowledgement body
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    pub success: bool,
    pub message: String,
    pub data: Option<Value>,
}

impl Ack {
    fn ok(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            data: None,
        })
    }
}

// === Posts ===

pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Page<Post>>> {
    let posts = state.posts.list().await?;
    Ok(Json(run_listing(posts, &params, state.config.listings.posts)))
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

pub async fn featured_posts(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Post>>> {
    let posts = state.posts.list().await?;
    let limit = query.limit.unwrap_or(DEFAULT_RELATED_LIMIT);
    Ok(Json(post::featured(&posts, limit).into_iter().cloned().collect()))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Taxonomy {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

pub async fn post_taxonomy(State(state): State<AppState>) -> Result<Json<Taxonomy>> {
    let posts = state.posts.list().await?;
    Ok(Json(Taxonomy {
        categories: post::categories(&posts),
        tags: post::tags(&posts),
    }))
}

pub async fn posts_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Post>>> {
    let posts = state.posts.list().await?;
    Ok(Json(post::posts_by_category(&posts, &category).into_iter().cloned().collect()))
}

pub async fn posts_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<Vec<Post>>> {
    let posts = state.posts.list().await?;
    Ok(Json(post::posts_by_tag(&posts, &tag).into_iter().cloned().collect()))
}

pub async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Post>> {
    state
        .posts
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| BlogError::not_found("post", &id))
}

/// Minimal reference to a neighbouring post
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PostRef {
    pub id: String,
    pub slug: String,
    pub title: String,
}

impl From<&Post> for PostRef {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            slug: post.slug.clone(),
            title: post.title.clone(),
        }
    }
}

/// A post with its reading context
#[derive(Debug, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: Post,
    pub related: Vec<Post>,
    pub previous: Option<PostRef>,
    pub next: Option<PostRef>,
}

/// Post by slug, with related posts and neighbours in default order
pub async fn get_post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>> {
    let posts = state.posts.list().await?;
    let current = posts
        .iter()
        .find(|p| p.slug == slug)
        .cloned()
        .ok_or_else(|| BlogError::not_found("post", &slug))?;

    let listing = Listing::from_entities(posts, Post::listing().default_limit);
    let ordered: Vec<Post> = listing.ordered().into_iter().cloned().collect();
    let around = post::surrounding(&ordered, &current.id);

    Ok(Json(PostDetail {
        related: post::related_posts(listing.entities(), &current, DEFAULT_RELATED_LIMIT)
            .into_iter()
            .cloned()
            .collect(),
        previous: around.previous.map(PostRef::from),
        next: around.next.map(PostRef::from),
        post: current,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenderedPost {
    pub id: String,
    pub html: String,
}

pub async fn get_post_html(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RenderedPost>> {
    let post = state
        .posts
        .get(&id)
        .await?
        .ok_or_else(|| BlogError::not_found("post", &id))?;
    Ok(Json(RenderedPost {
        html: render_rich_text(&post.content),
        id: post.id,
    }))
}

pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewPost>,
) -> Result<(StatusCode, Json<Post>)> {
    let admin = state.require_admin(&headers)?;
    let created = state.posts.create(payload.into_post()?).await?;
    tracing::info!(post_id = %created.id, by = %admin.username, "post created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<PostPatch>,
) -> Result<Json<Post>> {
    let admin = state.require_admin(&headers)?;
    let updated = state.posts.update(&id, patch.checked()?).await?;
    tracing::info!(post_id = %id, by = %admin.username, "post updated");
    Ok(Json(updated))
}

pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let admin = state.require_admin(&headers)?;
    state.posts.delete(&id).await?;
    tracing::info!(post_id = %id, by = %admin.username, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

// === Users ===

pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Page<PublicUser>>> {
    let users = state.users.list().await?;
    Ok(Json(run_listing(users, &params, state.config.listings.users)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PublicUser>> {
    state
        .users
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| BlogError::not_found("user", &id))
}

// === Auth ===

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    pub token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<AuthResponse>> {
    credentials.validate()?;
    let user = state.auth.login(&credentials)?;
    let token = state.sessions.open(user.clone())?;
    tracing::info!(username = %user.username, "login succeeded");
    Ok(Json(AuthResponse { user, token }))
}

pub async fn register(
    State(state): State<AppState>,
    Json(data): Json<RegisterData>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    data.validate()?;
    let user = state.auth.register(&data)?;
    let token = state.sessions.open(user.clone())?;
    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<AuthUser>> {
    let user = state.current_user(&headers)?;
    auth::require(user.as_ref(), &[]).map(Json)
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Ack>> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.close(token)?;
    }
    Ok(Ack::ok("Logged out"))
}

// === Analytics & contact ===

fn client_ip(headers: &HeaderMap) -> &str {
    ["x-forwarded-for", "x-real-ip"]
        .iter()
        .find_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()))
        .unwrap_or("unknown")
}

fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

pub async fn track_pageview(headers: HeaderMap, Json(body): Json<Value>) -> Json<Ack> {
    tracing::info!(
        user_agent = user_agent(&headers),
        ip = client_ip(&headers),
        payload = %body,
        "page view"
    );
    Ack::ok("Page view tracked successfully")
}

pub async fn track_event(headers: HeaderMap, Json(body): Json<Value>) -> Json<Ack> {
    tracing::info!(
        user_agent = user_agent(&headers),
        ip = client_ip(&headers),
        payload = %body,
        "analytics event"
    );
    Ack::ok("Event tracked successfully")
}

/// Contact form submission
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "is required"))]
    pub message: String,
}

pub async fn contact(Json(form): Json<ContactForm>) -> Result<Json<Ack>> {
    form.validate()?;
    tracing::info!(
        name = %form.name,
        email = %form.email,
        subject = %form.subject,
        "contact form received"
    );
    Ok(Ack::ok("Message received, we will get back to you soon"))
}
