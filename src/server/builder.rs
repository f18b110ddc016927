//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::AppState;
use super::router::build_api_routes;
use crate::config::AppConfig;
use crate::core::{AuthDirectory, DataService, KeyValueStore, SessionRegistry};
use crate::entities::post::sample_posts;
use crate::entities::user::sample_users;
use crate::entities::{Post, PublicUser};
use crate::storage::{InMemoryDataService, InMemoryKeyValueStore, KvDataService};
use anyhow::{Context, Result};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the blog HTTP server
///
/// Anything not supplied falls back to an in-process default: posts live in
/// a JSON blob inside an in-memory key-value store, users come from the
/// sample directory, and the auth directory holds the demo accounts.
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(AppConfig::from_yaml_file("blogflow.yaml")?)
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    kv_store: Option<Arc<dyn KeyValueStore>>,
    post_service: Option<Arc<dyn DataService<Post>>>,
    user_service: Option<Arc<dyn DataService<PublicUser>>>,
    auth: Option<Arc<AuthDirectory>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            kv_store: None,
            post_service: None,
            user_service: None,
            auth: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Persist posts in `store` under the configured key
    pub fn with_kv_store(mut self, store: impl KeyValueStore + 'static) -> Self {
        self.kv_store = Some(Arc::new(store));
        self
    }

    /// Use a custom post service; takes precedence over the key-value store
    pub fn with_post_service(mut self, service: impl DataService<Post> + 'static) -> Self {
        self.post_service = Some(Arc::new(service));
        self
    }

    pub fn with_user_service(mut self, service: impl DataService<PublicUser> + 'static) -> Self {
        self.user_service = Some(Arc::new(service));
        self
    }

    pub fn with_auth_directory(mut self, directory: AuthDirectory) -> Self {
        self.auth = Some(Arc::new(directory));
        self
    }

    /// Add routes that are merged next to the API routes
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Assemble the shared handler state
    pub fn build_state(&mut self) -> Result<AppState> {
        self.config.validate().context("invalid configuration")?;

        let posts = match self.post_service.take() {
            Some(service) => service,
            None => {
                let store = self
                    .kv_store
                    .take()
                    .unwrap_or_else(|| Arc::new(InMemoryKeyValueStore::new()));
                let service = KvDataService::new(store, self.config.storage.posts_key.clone());
                if self.config.storage.seed_sample_posts {
                    service
                        .seed_if_empty(sample_posts())
                        .context("failed to seed sample posts")?;
                }
                Arc::new(service) as Arc<dyn DataService<Post>>
            }
        };

        let users = self
            .user_service
            .take()
            .unwrap_or_else(|| Arc::new(InMemoryDataService::with_entities(sample_users())));

        let auth = self
            .auth
            .take()
            .unwrap_or_else(|| Arc::new(AuthDirectory::seeded()));

        Ok(AppState {
            posts,
            users,
            auth,
            sessions: Arc::new(SessionRegistry::new()),
            config: Arc::new(self.config.clone()),
        })
    }

    /// Build the final router
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        let mut app = health_routes().merge(build_api_routes(state));

        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        Ok(app
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds `addr`, then serves until SIGTERM or Ctrl+C.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "blogflow"
    }))
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
