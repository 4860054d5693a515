use crate::error::AuthError;
use crate::models::token::{ADMIN_SUBJECT, Claims};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::sync::Arc;

/// How long an issued token stays valid.
pub const TOKEN_TTL_HOURS: i64 = 1;

/// Issues and verifies HS256 admin tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    /// Signs a fresh admin token that expires after [`TOKEN_TTL_HOURS`].
    ///
    /// No credentials are checked: anyone who can reach `/login` gets one.
    pub fn issue(&self) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Checks signature, expiry and subject.
    ///
    /// Every failure collapses into [`AuthError::Invalid`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.sub = Some(ADMIN_SUBJECT.to_string());
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify() {
        let service = TokenService::new("football_secret");
        let token = service.issue().unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert!(claims.exp > chrono::Utc::now().timestamp());
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = TokenService::new("one").issue().unwrap();
        assert_eq!(TokenService::new("two").verify(&token).unwrap_err(), AuthError::Invalid);
    }

    #[test]
    fn garbage_is_rejected() {
        let service = TokenService::new("football_secret");
        assert_eq!(service.verify("not.a.jwt").unwrap_err(), AuthError::Invalid);
        assert_eq!(service.verify("").unwrap_err(), AuthError::Invalid);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            // Well past the default leeway.
            exp: chrono::Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"football_secret"),
        )
        .unwrap();
        let service = TokenService::new("football_secret");
        assert_eq!(service.verify(&token).unwrap_err(), AuthError::Invalid);
    }

    #[test]
    fn wrong_subject_is_rejected() {
        let claims = Claims {
            sub: "someone-else".to_string(),
            exp: chrono::Utc::now().timestamp() + 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"football_secret"),
        )
        .unwrap();
        let service = TokenService::new("football_secret");
        assert_eq!(service.verify(&token).unwrap_err(), AuthError::Invalid);
    }
}
