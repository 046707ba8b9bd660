//! Token types issued by the Finport auth endpoints

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Access/refresh token pair returned by login, register and refresh.
///
/// A pair is never mutated; a refresh produces a new pair that replaces the
/// stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer credential
    pub access_token: String,

    /// Long-lived credential used to mint a new access token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: u64,
}

/// What actually lands in secure storage: the pair plus when it was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub issued_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Stamp a freshly issued pair with the current time.
    pub fn issue(pair: &TokenPair) -> Self {
        Self {
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
            expires_in: pair.expires_in,
            issued_at: Utc::now(),
        }
    }

    /// Expiry derived from `issued_at + expires_in`, or the JWT `exp` claim
    /// when the server reported no lifetime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.expires_in > 0 {
            let secs = i64::try_from(self.expires_in).ok()?;
            return Some(self.issued_at + Duration::seconds(secs));
        }
        jwt_expiry(&self.access_token)
    }

    /// True when the access token is past its expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at().is_some_and(|exp| exp <= Utc::now())
    }
}

/// Email/password body for `/auth/login` and `/auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `/auth/refresh`
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Read the `exp` claim out of a JWT without verifying it.
///
/// Returns `None` for opaque (non-JWT) tokens.
pub fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    #[derive(Deserialize)]
    struct Claims {
        exp: i64,
    }

    let mut parts = token.split('.');
    let (_, payload, _) = (parts.next()?, parts.next()?, parts.next()?);
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"ann@example.com","exp":{}}}"#, exp));
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn test_token_pair_deserializes_from_server_shape() {
        let pair: TokenPair = serde_json::from_str(
            r#"{"access_token":"a1","refresh_token":"r1","expires_in":900}"#,
        )
        .unwrap();
        assert_eq!(pair.access_token, "a1");
        assert_eq!(pair.refresh_token, "r1");
        assert_eq!(pair.expires_in, 900);
    }

    #[test]
    fn test_token_pair_requires_access_token() {
        let result =
            serde_json::from_str::<TokenPair>(r#"{"refresh_token":"r1","expires_in":900}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_record_expiry_from_expires_in() {
        let pair = TokenPair {
            access_token: "opaque".to_string(),
            refresh_token: "r".to_string(),
            expires_in: 3600,
        };
        let record = CredentialRecord::issue(&pair);
        let expires_at = record.expires_at().unwrap();
        assert!(expires_at > Utc::now() + Duration::minutes(59));
        assert!(!record.is_expired());
    }

    #[test]
    fn test_record_expiry_falls_back_to_jwt_claim() {
        let exp = (Utc::now() - Duration::hours(1)).timestamp();
        let record = CredentialRecord {
            access_token: jwt_with_exp(exp),
            refresh_token: "r".to_string(),
            expires_in: 0,
            issued_at: Utc::now(),
        };
        assert_eq!(record.expires_at().unwrap().timestamp(), exp);
        assert!(record.is_expired());
    }

    #[test]
    fn test_jwt_expiry_rejects_opaque_tokens() {
        assert!(jwt_expiry("not-a-jwt").is_none());
        assert!(jwt_expiry("a.!!!.c").is_none());
    }
}
