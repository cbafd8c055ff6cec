use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::models::auth::{Actor, Claims, Role};

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or((StatusCode::UNAUTHORIZED, "Invalid Authorization header format"))?;

        let secret = parts
            .extensions
            .get::<JwtSecret>()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "JWT secret not configured"))?;

        decode_access_token(token, &secret.0)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))
    }
}

/// Extension type to carry the JWT secret through request extensions.
#[derive(Clone)]
pub struct JwtSecret(pub String);

pub fn decode_access_token(token: &str, secret: &str) -> Result<Actor, anyhow::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation)?;
    let claims = data.claims;

    Ok(Actor {
        user_id: claims.sub.parse()?,
        role: claims.role,
    })
}

/// Mint an access token. Identity management lives elsewhere; this is used
/// by operational tooling and tests.
pub fn issue_access_token(
    user_id: Uuid,
    role: Role,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, anyhow::Error> {
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: (chrono::Utc::now().timestamp() + ttl_seconds) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_preserves_actor() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, Role::Admin, "secret", 60).unwrap();
        let actor = decode_access_token(&token, "secret").unwrap();
        assert_eq!(actor.user_id, user_id);
        assert_eq!(actor.role, Role::Admin);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_access_token(Uuid::new_v4(), Role::Member, "secret", 60).unwrap();
        assert!(decode_access_token(&token, "other-secret").is_err());
    }
}
