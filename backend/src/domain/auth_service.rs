//! Registration, login, and token authentication.
//!
//! Credentials are stored and compared as plain text and tokens never
//! expire. That is documented prototype behavior, not an oversight to fix
//! here; see DESIGN.md.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::phone::normalize_phone;
use crate::error::{Result, ServiceError};
use crate::storage::{JsonStore, SessionRegistry};
use shared::{AuthResponse, Family, LoginRequest, RegisterRequest, Role, User};

/// Service for account registration and session management.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<JsonStore>,
    sessions: Arc<SessionRegistry>,
}

impl AuthService {
    pub fn new(store: Arc<JsonStore>, sessions: Arc<SessionRegistry>) -> Self {
        Self { store, sessions }
    }

    /// Register a new user, creating or joining a family, and mint a token.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse> {
        let username = required_trimmed(request.username.as_deref(), "username")?;
        let password = required(request.password.as_deref(), "password")?;
        let phone_raw = required_trimmed(request.phone.as_deref(), "phone")?;

        info!("Registering user: {} (head: {})", username, request.is_head);

        let phone = normalize_phone(&phone_raw);
        let role = if request.is_head {
            Role::HeadOfFamily
        } else {
            Role::Adult
        };
        let user_id = User::generate_id();
        let is_head = request.is_head;
        let join_family_id = request.family_id.clone();

        let user = self.store.mutate(|data| {
            if data.users.iter().any(|u| u.username == username) {
                return Err(ServiceError::Conflict(format!(
                    "username '{}' is already taken",
                    username
                )));
            }

            let family_id = match &join_family_id {
                Some(id) => {
                    let family = data
                        .families
                        .iter_mut()
                        .find(|f| &f.id == id)
                        .ok_or_else(|| ServiceError::NotFound("family".to_string()))?;
                    if is_head {
                        family.heads.push(user_id.clone());
                    }
                    family.id.clone()
                }
                None => {
                    let family = Family {
                        id: Family::generate_id(),
                        heads: if is_head {
                            vec![user_id.clone()]
                        } else {
                            Vec::new()
                        },
                    };
                    let id = family.id.clone();
                    data.families.push(family);
                    id
                }
            };

            let user = User {
                id: user_id.clone(),
                username: username.clone(),
                password: password.clone(),
                phone: phone.clone(),
                role,
                family_id,
            };
            data.users.push(user.clone());
            Ok(user)
        })?;

        let token = self.sessions.create(&user.id);
        info!("Registered user {} with ID {}", user.username, user.id);

        Ok(AuthResponse {
            token,
            user: user.view(),
        })
    }

    /// Log an existing user in with a plaintext credential comparison.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        let username = required_trimmed(request.username.as_deref(), "username")?;
        let password = required(request.password.as_deref(), "password")?;

        info!("Login attempt for user: {}", username);

        let user = self
            .store
            .read(|data| data.users.iter().find(|u| u.username == username).cloned());

        let user = match user {
            Some(user) if user.password == password => user,
            _ => {
                warn!("Login failed for user: {}", username);
                return Err(ServiceError::Unauthorized(
                    "invalid username or password".to_string(),
                ));
            }
        };

        let token = self.sessions.create(&user.id);
        Ok(AuthResponse {
            token,
            user: user.view(),
        })
    }

    /// Revoke a token. Revoking an unknown token is not an error.
    pub async fn logout(&self, token: &str) {
        if self.sessions.revoke(token) {
            info!("Session revoked");
        }
    }

    /// Resolve a bearer token to its user, or fail with 401.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let user_id = self
            .sessions
            .user_id_for(token)
            .ok_or_else(|| ServiceError::Unauthorized("invalid or expired token".to_string()))?;

        self.store
            .read(|data| data.users.iter().find(|u| u.id == user_id).cloned())
            .ok_or_else(|| ServiceError::Unauthorized("invalid or expired token".to_string()))
    }
}

fn required(value: Option<&str>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ServiceError::Validation(format!("{} is required", field))),
    }
}

fn required_trimmed(value: Option<&str>, field: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ServiceError::Validation(format!("{} is required", field))),
    }
}
