//! Mock authentication for the admin surface
//!
//! Credentials are checked against an in-process directory seeded with one
//! administrator and two regular accounts. A successful login opens a
//! session identified by an opaque bearer token; sessions expire after a
//! fixed lifetime and expired ones are pruned on the next login.

use crate::core::error::{AuthError, Result, StorageError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

/// Password shared by the seeded non-admin accounts
const DEFAULT_USER_PASSWORD: &str = "123456";

/// Role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Author,
    Editor,
    Subscriber,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Author => "author",
            Role::Editor => "editor",
            Role::Subscriber => "subscriber",
            Role::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "author" => Ok(Role::Author),
            "editor" => Ok(Role::Editor),
            "subscriber" => Ok(Role::Subscriber),
            "guest" => Ok(Role::Guest),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// An authenticated account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: Role,
    pub permissions: Vec<String>,
    pub is_active: bool,
}

impl AuthUser {
    /// Check whether the user holds any of `roles`
    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Check whether the user holds any of `permissions`
    pub fn has_permission(&self, permissions: &[&str]) -> bool {
        permissions
            .iter()
            .any(|p| self.permissions.iter().any(|held| held == p))
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins, authors and editors may write content
    pub fn is_author(&self) -> bool {
        self.has_role(&[Role::Admin, Role::Author, Role::Editor])
    }
}

/// Require an authenticated user holding one of `roles`
///
/// An empty `roles` slice only requires authentication.
pub fn require(user: Option<&AuthUser>, roles: &[Role]) -> Result<AuthUser> {
    let user = user.ok_or(AuthError::Unauthenticated)?;
    if !roles.is_empty() && !user.has_role(roles) {
        let required = roles
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join("|");
        return Err(AuthError::Forbidden { required }.into());
    }
    Ok(user.clone())
}

/// Login payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    #[validate(length(min = 3, max = 32, message = "must be 3 to 32 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "is required"))]
    pub display_name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

struct Account {
    user: AuthUser,
    password: String,
}

/// Credential directory
pub struct AuthDirectory {
    accounts: RwLock<Vec<Account>>,
}

impl AuthDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(Vec::new()),
        }
    }

    /// Create a directory holding the administrator and the two demo users
    pub fn seeded() -> Self {
        let accounts = vec![
            Account {
                user: seed_admin(),
                password: "admin123".to_string(),
            },
            Account {
                user: AuthUser {
                    id: "user-1".to_string(),
                    username: "johndev".to_string(),
                    display_name: "John Developer".to_string(),
                    email: "john@example.com".to_string(),
                    avatar: None,
                    role: Role::Author,
                    permissions: vec!["posts.create".to_string(), "posts.edit".to_string()],
                    is_active: true,
                },
                password: DEFAULT_USER_PASSWORD.to_string(),
            },
            Account {
                user: AuthUser {
                    id: "user-2".to_string(),
                    username: "sarahui".to_string(),
                    display_name: "Sarah Designer".to_string(),
                    email: "sarah@example.com".to_string(),
                    avatar: None,
                    role: Role::Subscriber,
                    permissions: Vec::new(),
                    is_active: true,
                },
                password: DEFAULT_USER_PASSWORD.to_string(),
            },
        ];
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    /// Check credentials
    pub fn login(&self, credentials: &LoginCredentials) -> Result<AuthUser> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| StorageError::Backend(format!("Failed to acquire read lock: {}", e)))?;

        accounts
            .iter()
            .find(|a| a.user.email == credentials.email && a.password == credentials.password)
            .filter(|a| a.user.is_active)
            .map(|a| a.user.clone())
            .ok_or_else(|| AuthError::InvalidCredentials.into())
    }

    /// Register a new subscriber account
    pub fn register(&self, data: &RegisterData) -> Result<AuthUser> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| StorageError::Backend(format!("Failed to acquire write lock: {}", e)))?;

        if accounts
            .iter()
            .any(|a| a.user.username == data.username || a.user.email == data.email)
        {
            return Err(AuthError::Duplicate.into());
        }

        let user = AuthUser {
            id: format!("user-{}", Uuid::new_v4()),
            username: data.username.clone(),
            display_name: data.display_name.clone(),
            email: data.email.clone(),
            avatar: None,
            role: Role::Subscriber,
            permissions: Vec::new(),
            is_active: true,
        };
        accounts.push(Account {
            user: user.clone(),
            password: data.password.clone(),
        });
        tracing::info!(username = %user.username, "registered new account");
        Ok(user)
    }
}

impl Default for AuthDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_admin() -> AuthUser {
    AuthUser {
        id: "admin-1".to_string(),
        username: "admin".to_string(),
        display_name: "Administrator".to_string(),
        email: "admin@blogflow.com".to_string(),
        avatar: None,
        role: Role::Admin,
        permissions: [
            "admin.dashboard",
            "admin.users.view",
            "admin.users.edit",
            "admin.users.delete",
            "admin.posts.view",
            "admin.posts.edit",
            "admin.posts.delete",
            "admin.settings.view",
            "admin.settings.edit",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
        is_active: true,
    }
}

/// Lifetime of a session when none is configured
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

struct Session {
    user: AuthUser,
    issued_at: DateTime<Utc>,
}

/// Open sessions keyed by bearer token
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }

    /// Registry whose sessions expire `ttl` after login
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_live(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now - session.issued_at < self.ttl
    }

    /// Open a session and return its token
    pub fn open(&self, user: AuthUser) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| StorageError::Backend(format!("Failed to acquire write lock: {}", e)))?;

        let before = sessions.len();
        sessions.retain(|_, session| self.is_live(session, now));
        if sessions.len() < before {
            tracing::debug!(pruned = before - sessions.len(), "expired sessions pruned");
        }

        sessions.insert(token.clone(), Session { user, issued_at: now });
        Ok(token)
    }

    /// Resolve a token to its user; expired tokens resolve to `None`
    pub fn resolve(&self, token: &str) -> Result<Option<AuthUser>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| StorageError::Backend(format!("Failed to acquire read lock: {}", e)))?;
        let now = Utc::now();
        Ok(sessions
            .get(token)
            .filter(|session| self.is_live(session, now))
            .map(|session| session.user.clone()))
    }

    /// Close a session; closing an unknown token is a no-op
    pub fn close(&self, token: &str) -> Result<()> {
        self.sessions
            .write()
            .map_err(|e| StorageError::Backend(format!("Failed to acquire write lock: {}", e)))?
            .remove(token);
        Ok(())
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
