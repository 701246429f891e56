//! Access token 签发与校验：HS256 紧凑 JWT（`header.claims.signature`）。

use std::{fmt, time::Duration};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::unix_now;

type HmacSha256 = Hmac<Sha256>;

/// 固定 JWT header。
const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;
/// 唯一接受的签名算法。
const JWT_ALG: &str = "HS256";

/// access token claims。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 用户名。
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenHeader {
    alg: String,
}

/// 令牌校验错误，仅用于日志，不回传给客户端。
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TokenError {
    /// 分段数量或 base64 编码不合法。
    Malformed,
    /// header 声明的算法不是 HS256。
    Algorithm,
    /// 签名校验失败。
    Signature,
    /// claims 无法解析或 subject 为空。
    Claims,
    /// 已过期。
    Expired,
    /// 签名密钥不可用。
    Key,
    /// claims 编码失败。
    Encode,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Malformed => "malformed token",
            Self::Algorithm => "unsupported token algorithm",
            Self::Signature => "token signature mismatch",
            Self::Claims => "invalid token claims",
            Self::Expired => "token expired",
            Self::Key => "signing key unusable",
            Self::Encode => "encode token claims failed",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for TokenError {}

/// 令牌签名器：持有服务签名密钥与默认有效期。
#[derive(Clone)]
pub struct TokenSigner {
    signing_key: Vec<u8>,
    ttl: Duration,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("signing_key", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenSigner {
    pub fn new(signing_key: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            signing_key: signing_key.into(),
            ttl,
        }
    }

    /// 默认有效期。
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 以指定有效期签发。
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, ttl, unix_now())
    }

    /// 以给定的当前时间签发，`exp = now + ttl`。
    pub fn issue_at(&self, subject: &str, ttl: Duration, now: u64) -> Result<String, TokenError> {
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now,
            exp: now.saturating_add(ttl.as_secs()),
        };
        let payload = serde_json::to_vec(&claims).map_err(|_| TokenError::Encode)?;
        let header_b64 = URL_SAFE_NO_PAD.encode(JWT_HEADER.as_bytes());
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
        let signing_input = format!("{header_b64}.{payload_b64}");
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let sig_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{signing_input}.{sig_b64}"))
    }

    /// 以当前时间校验。
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.decode_at(token, unix_now())
    }

    /// 校验签名、算法与有效期，返回 claims。
    pub fn decode_at(&self, token: &str, now: u64) -> Result<TokenClaims, TokenError> {
        let mut parts = token.trim().split('.');
        let header_b64 = parts.next().unwrap_or_default();
        let payload_b64 = parts.next().unwrap_or_default();
        let sig_b64 = parts.next().unwrap_or_default();
        if header_b64.is_empty()
            || payload_b64.is_empty()
            || sig_b64.is_empty()
            || parts.next().is_some()
        {
            return Err(TokenError::Malformed);
        }

        let header_raw = URL_SAFE_NO_PAD
            .decode(header_b64.as_bytes())
            .map_err(|_| TokenError::Malformed)?;
        let header: TokenHeader =
            serde_json::from_slice(&header_raw).map_err(|_| TokenError::Malformed)?;
        if header.alg != JWT_ALG {
            return Err(TokenError::Algorithm);
        }

        let sig = URL_SAFE_NO_PAD
            .decode(sig_b64.as_bytes())
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&sig).map_err(|_| TokenError::Signature)?;

        let payload_raw = URL_SAFE_NO_PAD
            .decode(payload_b64.as_bytes())
            .map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&payload_raw).map_err(|_| TokenError::Claims)?;
        if claims.sub.trim().is_empty() {
            return Err(TokenError::Claims);
        }
        if claims.exp <= now {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.signing_key).map_err(|_| TokenError::Key)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

    use super::{TokenError, TokenSigner};

    const NOW: u64 = 1_760_000_000;

    fn signer() -> TokenSigner {
        TokenSigner::new(b"unit-test-key".to_vec(), Duration::from_secs(30 * 60))
    }

    #[test]
    fn issued_token_decodes_until_expiry() {
        let signer = signer();
        let token = signer
            .issue_at("alice", Duration::from_secs(60), NOW)
            .expect("issue should succeed");

        let claims = signer.decode_at(&token, NOW + 59).expect("token valid");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp, NOW + 60);

        assert_eq!(signer.decode_at(&token, NOW + 60), Err(TokenError::Expired));
    }

    #[test]
    fn token_has_three_segments_and_hs256_header() {
        let token = signer()
            .issue_at("alice", Duration::from_secs(60), NOW)
            .expect("issue should succeed");
        let segments = token.split('.').collect::<Vec<&str>>();
        assert_eq!(segments.len(), 3);
        let header = URL_SAFE_NO_PAD
            .decode(segments[0].as_bytes())
            .expect("header should be base64url");
        assert_eq!(header, br#"{"alg":"HS256","typ":"JWT"}"#);
    }

    #[test]
    fn foreign_key_is_rejected() {
        let token = signer()
            .issue_at("alice", Duration::from_secs(60), NOW)
            .expect("issue should succeed");
        let other = TokenSigner::new(b"other-key".to_vec(), Duration::from_secs(60));
        assert_eq!(other.decode_at(&token, NOW), Err(TokenError::Signature));
    }

    #[test]
    fn tampered_claims_are_rejected() {
        let signer = signer();
        let token = signer
            .issue_at("alice", Duration::from_secs(60), NOW)
            .expect("issue should succeed");
        let mut segments = token.split('.').map(str::to_string).collect::<Vec<String>>();
        segments[1] = URL_SAFE_NO_PAD.encode(br#"{"sub":"mallory","iat":0,"exp":99999999999}"#);
        let forged = segments.join(".");
        assert_eq!(signer.decode_at(&forged, NOW), Err(TokenError::Signature));
    }

    #[test]
    fn unsigned_and_garbage_tokens_are_malformed() {
        let signer = signer();
        assert_eq!(signer.decode_at("", NOW), Err(TokenError::Malformed));
        assert_eq!(signer.decode_at("a.b", NOW), Err(TokenError::Malformed));
        assert_eq!(signer.decode_at("a.b.c.d", NOW), Err(TokenError::Malformed));

        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"alice","iat":0,"exp":99999999999}"#);
        let unsigned = format!("{header}.{payload}.x");
        assert_eq!(signer.decode_at(&unsigned, NOW), Err(TokenError::Algorithm));
    }
}
