use anyhow::Result;
use chrono::{Duration, Utc};
use common::Role;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT claims carried by every session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Display name.
    pub sub: String,
    /// User id.
    pub uid: String,
    /// Team scope, if any.
    pub team: Option<String>,
    pub role: Role,
    /// Expiration timestamp.
    pub exp: usize,
}

/// Sign a session token.
pub fn sign(
    user_id: &str,
    display_name: &str,
    team_id: Option<&str>,
    role: Role,
    ttl_days: i64,
    secret: &str,
) -> Result<String> {
    let expiration = (Utc::now() + Duration::days(ttl_days)).timestamp();

    let claims = Claims {
        sub: display_name.to_owned(),
        uid: user_id.to_owned(),
        team: team_id.map(String::from),
        role,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a session token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
