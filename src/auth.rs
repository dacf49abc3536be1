// src/auth.rs
use crate::app_log;
use anyhow::Result;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};

const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub exp: usize, // Expiration timestamp
}

pub struct AuthConfig {
    decoding_key: DecodingKey,
}

impl AuthConfig {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Verify an HS256 session token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}

/// Caller identified by a valid session token
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_config = match req.guard::<&State<AuthConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => return reject(req, status, AuthError::NotConfigured),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        // Bearer header first, then the session cookie
        let token = match req.headers().get_one("Authorization") {
            Some(header) => match header.strip_prefix("Bearer ") {
                Some(token) => token.to_string(),
                None => {
                    app_log!(warn, "Invalid Authorization header format");
                    return reject(req, Status::Unauthorized, AuthError::InvalidToken);
                }
            },
            None => match req.cookies().get(TOKEN_COOKIE) {
                Some(cookie) => cookie.value().to_string(),
                None => {
                    app_log!(debug, "Missing Authorization header and token cookie");
                    return reject(req, Status::Unauthorized, AuthError::MissingToken);
                }
            },
        };

        match auth_config.verify(&token) {
            Ok(claims) => {
                app_log!(debug, "Authenticated user {}", claims.user_id);
                Outcome::Success(AuthenticatedUser {
                    user_id: claims.user_id,
                })
            }
            Err(e) => {
                app_log!(warn, "Token verification failed: {}", e);
                reject(req, Status::Unauthorized, AuthError::TokenVerificationFailed)
            }
        }
    }
}

/// Why the guard turned a request away, kept for the error catcher
struct AuthFailure(Option<AuthError>);

fn reject(req: &Request<'_>, status: Status, error: AuthError) -> Outcome<AuthenticatedUser, AuthError> {
    req.local_cache(|| AuthFailure(Some(error)));
    Outcome::Error((status, error))
}

/// Reason recorded by a failed `AuthenticatedUser` guard on this request
pub fn failure_reason(req: &Request<'_>) -> Option<AuthError> {
    req.local_cache(|| AuthFailure(None)).0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    NotConfigured,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization token required",
            AuthError::InvalidToken => "Invalid authorization token format",
            AuthError::TokenVerificationFailed => "Token verification failed",
            AuthError::NotConfigured => "Authentication is not configured",
        }
    }
}

// Optional auth guard that doesn't fail if no auth is provided
pub struct OptionalAuth {
    pub user: Option<AuthenticatedUser>,
}

impl OptionalAuth {
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.user_id())
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalAuth {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(auth) => Outcome::Success(OptionalAuth { user: Some(auth) }),
            _ => Outcome::Success(OptionalAuth { user: None }),
        }
    }
}
