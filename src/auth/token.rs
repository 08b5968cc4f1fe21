use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: i32,
    /// Email address of the token's subject.
    pub email: String,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

/// Signs and verifies the bearer tokens the API issues.
///
/// The signing secret and token lifetime are injected at construction (one
/// codec per process, built in `main` from `Config`); nothing here reads the
/// environment. Verification is a pure function of the token, the secret, and
/// the current time. It does not consult the session store, so a token whose
/// session row was deleted at logout remains cryptographically valid until its
/// own expiry elapses. Handlers that need revocation semantics operate on the
/// session rows directly.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::minutes(ttl_minutes),
        }
    }

    /// Token lifetime, shared with the session rows this codec's tokens back.
    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Generates a signed token for a user, expiring `ttl` from now.
    pub fn sign(&self, user_id: i32, email: &str) -> Result<String, AppError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(self.ttl)
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            exp: expiration,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token string and decodes its claims.
    ///
    /// Returns `AppError::Unauthorized("Token expired")` once the embedded
    /// expiry has passed, and `AppError::Unauthorized("Invalid token")` for
    /// any other signature or format failure.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Token expired".into())
                }
                _ => AppError::Unauthorized("Invalid token".into()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(secret, 15)
    }

    #[test]
    fn test_token_generation_and_verification() {
        let codec = codec("test_secret_for_gen_verify");
        let token = codec.sign(1, "alex@example.com").unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.email, "alex@example.com");
    }

    #[test]
    fn test_token_expiration() {
        let codec = codec("test_secret_for_expiration");

        // Encode claims that expired two hours ago, well past the default
        // validation leeway, with the same secret the codec holds.
        let expiration = chrono::Utc::now()
            .checked_sub_signed(chrono::Duration::hours(2))
            .expect("valid timestamp")
            .timestamp() as usize;
        let claims_expired = Claims {
            sub: 2,
            email: "late@example.com".to_string(),
            exp: expiration,
        };
        let expired_token = encode(
            &Header::default(),
            &claims_expired,
            &EncodingKey::from_secret("test_secret_for_expiration".as_bytes()),
        )
        .unwrap();

        match codec.verify(&expired_token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Token expired"),
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let signer = codec("secret_one");
        let verifier = codec("secret_two");

        let token = signer.sign(3, "user@example.com").unwrap();

        match verifier.verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token"),
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let codec = codec("test_secret_garbage");
        match codec.verify("not-a-jwt-at-all") {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token"),
            other => panic!("Unexpected result for garbage token: {:?}", other.err()),
        }
    }
}
