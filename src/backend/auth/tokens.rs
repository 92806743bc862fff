/**
 * Personal Access Tokens
 *
 * This module issues and verifies opaque bearer tokens.
 *
 * # Token format
 *
 * The client receives `<token id>|<secret>`, where the secret is 40 random
 * alphanumeric characters. Only the SHA-256 hash of the secret is stored.
 *
 * Tokens have no expiry. They are destroyed all at once when their owner
 * logs out.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::backend::auth::users::{User, UserStore};
use crate::backend::error::BackendError;
use crate::backend::store::StoreError;

/// Length of the random part of a token
pub const SECRET_LENGTH: usize = 40;

/// Ability granted to every issued token
pub const ALL_ABILITIES: &str = "*";

const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Stored access token
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AccessToken {
    /// Token ID, the part before `|`
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Display name, `<user name>-<suffix>`
    pub name: String,
    /// Hex SHA-256 of the secret
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Granted abilities
    #[sqlx(json)]
    pub abilities: Vec<String>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to persist a token
#[derive(Debug, Clone)]
pub struct NewAccessToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub token_hash: String,
    pub abilities: Vec<String>,
}

/// A freshly issued token together with the only copy of its plain text
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: AccessToken,
    pub plain_text: String,
}

/// Name given to a user's token
pub fn token_name(user_name: &str, suffix: &str) -> String {
    format!("{}-{}", user_name, suffix)
}

/// Random alphanumeric string of `len` characters
pub fn random_string(len: usize) -> Result<String, getrandom::Error> {
    let mut out = String::with_capacity(len);
    let mut buf = [0u8; 64];

    while out.len() < len {
        getrandom::fill(&mut buf)?;
        // 248 = 4 * 62
        for byte in buf.iter().copied().filter(|b| *b < 248) {
            out.push(ALPHABET[(byte % 62) as usize] as char);
            if out.len() == len {
                break;
            }
        }
    }

    Ok(out)
}

/// Hex SHA-256 of a token secret
pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Split `<id>|<secret>` into its parts
pub fn parse_token(value: &str) -> Option<(Uuid, &str)> {
    let (id, secret) = value.split_once('|')?;
    let id = Uuid::parse_str(id).ok()?;
    if secret.is_empty() {
        return None;
    }
    Some((id, secret))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Create and persist a new token for `user`
pub async fn issue_token(
    store: &dyn UserStore,
    user: &User,
    suffix: &str,
) -> Result<IssuedToken, BackendError> {
    let secret = random_string(SECRET_LENGTH)?;
    let new_token = NewAccessToken {
        id: Uuid::new_v4(),
        user_id: user.id,
        name: token_name(&user.name, suffix),
        token_hash: hash_secret(&secret),
        abilities: vec![ALL_ABILITIES.to_string()],
    };

    let token = store.create_token(new_token).await?;
    let plain_text = format!("{}|{}", token.id, secret);

    tracing::debug!("Issued token {} for user {}", token.id, user.id);

    Ok(IssuedToken { token, plain_text })
}

/// Resolve a bearer token to its user.
///
/// Malformed, unknown and revoked tokens resolve to `None`. A successful
/// lookup updates the token's `last_used_at`.
pub async fn authenticate_token(
    store: &dyn UserStore,
    value: &str,
) -> Result<Option<(User, AccessToken)>, StoreError> {
    let Some((id, secret)) = parse_token(value) else {
        tracing::debug!("Malformed bearer token");
        return Ok(None);
    };

    let Some(token) = store.find_token(id).await? else {
        tracing::debug!("Unknown bearer token {}", id);
        return Ok(None);
    };

    if !constant_time_eq(hash_secret(secret).as_bytes(), token.token_hash.as_bytes()) {
        tracing::warn!("Bearer token {} presented with a wrong secret", id);
        return Ok(None);
    }

    let Some(user) = store.find_by_id(token.user_id).await? else {
        tracing::warn!("Token {} belongs to missing user {}", id, token.user_id);
        return Ok(None);
    };

    store.touch_token(token.id, Utc::now()).await?;

    Ok(Some((user, token)))
}
