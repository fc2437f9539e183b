// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use thiserror::Error;

/// 携带签名会话令牌的请求头
pub const SESSION_HEADER: &str = "X-Magda-Session";

const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

type HmacSha256 = Hmac<Sha256>;

/// 会话令牌错误
#[derive(Error, Debug)]
pub enum SessionTokenError {
    #[error("invalid signing key")]
    InvalidKey,

    #[error("failed to encode claims: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionClaims<'a> {
    user_id: &'a str,
    iat: i64,
}

/// 以当前时间签发会话令牌
pub fn build_session_token(secret: &str, user_id: &str) -> Result<String, SessionTokenError> {
    build_session_token_at(secret, user_id, Utc::now().timestamp())
}

/// 签发 HS256 JWT，载荷为 `{ userId, iat }`
pub fn build_session_token_at(
    secret: &str,
    user_id: &str,
    issued_at: i64,
) -> Result<String, SessionTokenError> {
    let header = URL_SAFE_NO_PAD.encode(JWT_HEADER);
    let claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&SessionClaims {
        user_id,
        iat: issued_at,
    })?);
    let signing_input = format!("{}.{}", header, claims);

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SessionTokenError::InvalidKey)?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}
