use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chefdeck_shared::Session;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, routes::AppState};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Expiration time (as UTC timestamp)
    pub exp: u64,
}

/// Issue a HS256 token. Production tokens come from the auth provider; this
/// is used by tooling and tests sharing the same secret.
pub fn generate_token(sub: &str, secret: &str, lifetime_seconds: u64) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = Claims {
        sub: sub.to_owned(),
        exp: now + lifetime_seconds,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn validate_token(token: &str, secret: &str) -> anyhow::Result<Session> {
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    if token_data.claims.sub.is_empty() {
        anyhow::bail!("token without subject");
    }

    Ok(Session::new(token_data.claims.sub))
}

/// Session of the caller, built from `Authorization: Bearer <token>`.
pub struct AuthSession(pub Session);

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

        let session = validate_token(bearer.token(), &state.jwt_secret).map_err(|err| {
            tracing::debug!("session token rejected: {err}");
            ApiError::Unauthorized
        })?;

        Ok(AuthSession(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_minimum_32_characters_long";

    #[test]
    fn test_token_round_trip() {
        let token = generate_token("john", SECRET, 60).unwrap();

        assert_eq!(validate_token(&token, SECRET).unwrap().user_id, "john");
    }

    #[test]
    fn test_token_rejections() {
        let token = generate_token("john", SECRET, 60).unwrap();
        assert!(validate_token(&token, "another_secret_key_of_32_characters__").is_err());

        assert!(validate_token("not-a-token", SECRET).is_err());

        let token = generate_token("", SECRET, 60).unwrap();
        assert!(validate_token(&token, SECRET).is_err());

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let expired = encode(
            &Header::default(),
            &Claims {
                sub: "john".to_owned(),
                exp: now - 3600,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(validate_token(&expired, SECRET).is_err());
    }
}
