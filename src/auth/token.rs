use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single message every credential failure surfaces with.
///
/// Expired, malformed, badly-signed and user-no-longer-exists all collapse
/// into this so that a caller probing the API cannot tell the cases apart.
pub(crate) const CREDENTIALS_ERROR: &str = "Could not validate credentials";

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
    /// Issuance timestamp (seconds since epoch).
    pub iat: usize,
}

/// Signing and verification keys for access tokens, plus the configured
/// time-to-live.
///
/// Built once at startup from [`crate::config::Config`] and handed by clone
/// to the auth middleware and the signup/login handlers. Nothing in this
/// module reads the environment; the secret always arrives through
/// [`TokenKeys::new`].
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::minutes(ttl_minutes),
        }
    }

    /// Issues a signed token for the given user id, expiring after the
    /// configured TTL.
    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let expiration = now
            .checked_add_signed(self.ttl)
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id,
            exp: expiration,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token's signature and expiry and decodes its claims.
    ///
    /// Every failure mode — bad signature, malformed payload, expiry —
    /// returns the identical `Unauthorized` error. The underlying reason is
    /// kept in server-side logs only.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("token rejected: {}", e);
                AppError::Unauthorized(CREDENTIALS_ERROR.into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> TokenKeys {
        TokenKeys::new("test_secret_for_token_unit_tests", 30)
    }

    #[test]
    fn test_token_issue_and_validate() {
        let keys = test_keys();
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id).unwrap();
        let claims = keys.validate(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_expiration() {
        let keys = test_keys();
        let user_id = Uuid::new_v4();

        // Encode a token that expired two hours ago, well past any
        // default leeway, signed with the same secret.
        let now = chrono::Utc::now();
        let expired_at = now
            .checked_sub_signed(chrono::Duration::hours(2))
            .expect("valid timestamp");
        let claims_expired = Claims {
            sub: user_id,
            exp: expired_at.timestamp() as usize,
            iat: expired_at
                .checked_sub_signed(chrono::Duration::minutes(30))
                .expect("valid timestamp")
                .timestamp() as usize,
        };
        let expired_token = encode(
            &Header::default(),
            &claims_expired,
            &EncodingKey::from_secret("test_secret_for_token_unit_tests".as_bytes()),
        )
        .unwrap();

        match keys.validate(&expired_token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, CREDENTIALS_ERROR),
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let other_keys = TokenKeys::new("a_completely_different_secret", 30);
        let token = other_keys.issue(Uuid::new_v4()).unwrap();

        match test_keys().validate(&token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, CREDENTIALS_ERROR),
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_failure_modes_are_indistinguishable() {
        let keys = test_keys();
        let token = keys.issue(Uuid::new_v4()).unwrap();

        // Tamper with the signature portion of a valid token.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let tampered_err = keys.validate(&tampered).unwrap_err();
        let garbage_err = keys.validate("not-a-jwt-at-all").unwrap_err();

        // Both must look exactly the same from the outside.
        match (tampered_err, garbage_err) {
            (AppError::Unauthorized(a), AppError::Unauthorized(b)) => {
                assert_eq!(a, b);
                assert_eq!(a, CREDENTIALS_ERROR);
            }
            (a, b) => panic!("Unexpected error variants: {:?} / {:?}", a, b),
        }
    }
}
