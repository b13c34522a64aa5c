// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session bootstrap.
//!
//! Resolves the signed-in user for the current process. Token issuance and
//! the sign-in UI live elsewhere; this module only reads the result.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::{tables, Query};
use crate::error::{AppError, Result};
use crate::models::{User, UserId};
use crate::services::fetch_rows;
use crate::AppContext;

/// Who, if anyone, is signed in.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated {
        user_id: UserId,
        /// Profile row, if the user has one
        profile: Option<User>,
    },
}

impl AuthState {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            AuthState::Authenticated { user_id, .. } => Some(*user_id),
            AuthState::Unauthenticated => None,
        }
    }
}

/// Source of the current user's identity.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_user(&self) -> Result<UserId>;
}

/// A fixed identity, or none.
#[derive(Debug, Clone)]
pub struct StaticAuth(pub Option<UserId>);

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn current_user(&self) -> Result<UserId> {
        self.0.ok_or(AppError::Unauthenticated)
    }
}

/// Access token claims we rely on.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// Identity taken from the `sub` claim of a session access token.
///
/// With a project secret the token is verified as HS256. Without one, only
/// expiry is checked; the row store still enforces the signature.
#[derive(Clone)]
pub struct TokenAuth {
    token: String,
    secret: Option<Vec<u8>>,
}

impl TokenAuth {
    pub fn new(token: impl Into<String>, secret: Option<Vec<u8>>) -> Self {
        Self {
            token: token.into(),
            secret,
        }
    }

    /// Provider for the access token in `config`, if there is one.
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .access_token
            .as_ref()
            .map(|token| Self::new(token.clone(), config.jwt_secret.clone()))
    }

    fn claims(&self) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        let key = match &self.secret {
            Some(secret) => DecodingKey::from_secret(secret),
            None => {
                validation.insecure_disable_signature_validation();
                DecodingKey::from_secret(&[])
            }
        };

        decode::<Claims>(&self.token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected access token");
                AppError::Unauthenticated
            })
    }
}

#[async_trait]
impl AuthProvider for TokenAuth {
    async fn current_user(&self) -> Result<UserId> {
        let claims = self.claims()?;
        UserId::parse(&claims.sub).map_err(|_| AppError::Unauthenticated)
    }
}

/// Resolve the session. Any failure, including an unreachable store, yields
/// [`AuthState::Unauthenticated`].
pub async fn bootstrap(ctx: &AppContext, auth: &dyn AuthProvider) -> AuthState {
    let user_id = match auth.current_user().await {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::warn!(error = %e, "No active session");
            return AuthState::Unauthenticated;
        }
    };

    let query = Query::from(tables::USERS)
        .eq("id", user_id.to_string())
        .limit(1);
    match fetch_rows::<User>(ctx.store.as_ref(), &query).await {
        Ok(rows) => {
            let profile = rows.into_iter().next();
            tracing::info!(user_id = %user_id, has_profile = profile.is_some(), "Session restored");
            AuthState::Authenticated { user_id, profile }
        }
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Session check failed");
            AuthState::Unauthenticated
        }
    }
}
