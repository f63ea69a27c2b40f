//! HS256 access tokens.
//!
//! A token carries the subject (the user id as a string), the issue time and
//! the expiry. Verification has a single contract: it returns the claims or a
//! [`TokenError`] saying whether the token expired or is otherwise invalid.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TOKEN_LIFETIME_MINUTES;
use crate::error::TokenError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // user id
    pub iat: i64,    // Issued at timestamp
    pub exp: i64,    // Expiration timestamp
}

/// Signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys").finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for `subject`.
    ///
    /// `lifetime` defaults to 15 minutes. Zero or negative lifetimes are
    /// accepted here and produce a token that never verifies.
    pub fn issue(&self, subject: &str, lifetime: Option<Duration>) -> Result<String, TokenError> {
        let lifetime =
            lifetime.unwrap_or_else(|| Duration::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES));
        let now = Utc::now();

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        // jsonwebtoken only rejects exp < now; a token is dead once exp is reached.
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new(b"test-secret")
    }

    #[test]
    fn test_round_trip() {
        let keys = keys();
        let token = keys.issue("42", None).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, "42");
    }

    #[test]
    fn test_default_lifetime_is_fifteen_minutes() {
        let keys = keys();
        let token = keys.issue("1", None).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_custom_lifetime() {
        let keys = keys();
        let token = keys.issue("1", Some(Duration::minutes(60))).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test]
    fn test_zero_lifetime_is_expired() {
        let keys = keys();
        let token = keys.issue("1", Some(Duration::zero())).unwrap();
        assert_eq!(keys.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_negative_lifetime_is_expired() {
        let keys = keys();
        let token = keys.issue("1", Some(Duration::minutes(-5))).unwrap();
        assert_eq!(keys.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let keys = keys();
        let token = keys.issue("1", None).unwrap();

        // Flip one character of the signature.
        let mut chars: Vec<char> = token.chars().collect();
        let last = chars.len() - 2;
        chars[last] = if chars[last] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        assert!(matches!(keys.verify(&tampered), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = keys().issue("1", None).unwrap();
        let other = JwtKeys::new(b"another-secret");
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(matches!(keys().verify("not.a.jwt"), Err(TokenError::Invalid(_))));
        assert!(matches!(keys().verify(""), Err(TokenError::Invalid(_))));
    }
}
