use std::sync::Arc;

use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        errors::{AuthError, MSG_LOGIN_FAILED, MSG_REGISTER_FAILED},
        jwt::JwtKeys,
        password::{hash_password, hash_password_blocking, verify_password_blocking},
        repo::UserStore,
        repo_types::{NewUser, StoreError, User},
    },
    state::AppState,
};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();

    // Verified against when the email is unknown so both login branches cost the same.
    static ref DUMMY_HASH: String =
        hash_password("timing-equalizer-not-a-real-password").unwrap_or_default();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Emails are compared case-insensitively by storing them trimmed and lowercased.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registration and login on top of a [`UserStore`] and [`JwtKeys`].
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(Arc::clone(&state.users), state.keys.clone())
    }
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let name = req.name.trim().to_string();
        let email = normalize_email(&req.email);

        if name.is_empty() {
            return Err(AuthError::Validation("El nombre es obligatorio".into()));
        }
        if !is_valid_email(&email) {
            warn!(email = %email, "invalid email");
            return Err(AuthError::Validation("Correo electrónico inválido".into()));
        }
        if req.password.trim().is_empty() {
            return Err(AuthError::Validation("La contraseña es obligatoria".into()));
        }

        let existing = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| AuthError::internal(MSG_REGISTER_FAILED, "database error", e))?;
        if existing.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AuthError::AlreadyRegistered);
        }

        let password_hash = hash_password_blocking(req.password)
            .await
            .map_err(|e| AuthError::internal(MSG_REGISTER_FAILED, "password hashing failed", e))?;

        let user = match self
            .users
            .create(NewUser {
                name,
                email,
                password_hash,
            })
            .await
        {
            Ok(u) => u,
            Err(StoreError::DuplicateEmail(email)) => {
                warn!(email = %email, "email registered concurrently");
                return Err(AuthError::AlreadyRegistered);
            }
            Err(e) => return Err(AuthError::internal(MSG_REGISTER_FAILED, "database error", e)),
        };

        let token = self
            .keys
            .sign(user.id)
            .map_err(|e| AuthError::internal(MSG_REGISTER_FAILED, "token signing failed", e))?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(to_response(user, token))
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&req.email);

        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| AuthError::internal(MSG_LOGIN_FAILED, "database error", e))?;

        let Some(user) = user else {
            // discard the result; only the elapsed time matters here
            let _ = verify_password_blocking(req.password, DUMMY_HASH.clone()).await;
            warn!(email = %email, "login unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let ok = verify_password_blocking(req.password, user.password_hash.clone())
            .await
            .map_err(|e| AuthError::internal(MSG_LOGIN_FAILED, "password verification failed", e))?;
        if !ok {
            warn!(email = %email, user_id = %user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .keys
            .sign(user.id)
            .map_err(|e| AuthError::internal(MSG_LOGIN_FAILED, "token signing failed", e))?;

        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(to_response(user, token))
    }
}

fn to_response(user: User, token: String) -> AuthResponse {
    AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    }
}
