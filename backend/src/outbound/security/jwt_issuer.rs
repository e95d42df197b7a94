//! HS256 JWT implementation of the token issuer port.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenIssuer, TokenIssuerError};
use crate::domain::UserId;

/// JWT claim set: subject plus the issuance and expiry instants.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Stateless HS256 bearer token issuer.
///
/// Tokens bind a user id to an expiry a fixed duration from issuance.
/// Verification enforces the expiry strictly (zero leeway) so a token is
/// accepted just before its deadline and rejected just after it.
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtTokenIssuer {
    /// Create an issuer from the shared signing secret and token lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &UserId) -> Result<String, TokenIssuerError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| TokenIssuerError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenIssuerError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Self::validation()).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenIssuerError::Expired,
                _ => TokenIssuerError::Invalid,
            },
        )?;

        UserId::new(&data.claims.sub).map_err(|_| TokenIssuerError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SECRET: &[u8] = b"test-signing-secret";

    fn issuer(ttl: Duration) -> JwtTokenIssuer {
        JwtTokenIssuer::new(SECRET, ttl)
    }

    #[rstest]
    fn issued_tokens_verify_back_to_the_user() {
        let issuer = issuer(Duration::minutes(60));
        let user = UserId::random();

        let token = issuer.issue(&user).expect("issue token");
        let verified = issuer.verify(&token).expect("verify token");

        assert_eq!(verified, user);
    }

    #[rstest]
    fn tokens_past_their_expiry_are_rejected_as_expired() {
        // A negative lifetime puts the expiry just before now.
        let issuer = issuer(Duration::seconds(-1));
        let token = issuer.issue(&UserId::random()).expect("issue token");

        assert_eq!(
            issuer.verify(&token).expect_err("expired"),
            TokenIssuerError::Expired
        );
    }

    #[rstest]
    fn tokens_before_their_expiry_are_accepted() {
        // A short lifetime is still inside the window when checked
        // immediately; strict expiry only bites past the deadline.
        let issuer = issuer(Duration::seconds(2));
        let token = issuer.issue(&UserId::random()).expect("issue token");

        assert!(issuer.verify(&token).is_ok());
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_invalid() {
        let other = JwtTokenIssuer::new(b"different-secret", Duration::minutes(60));
        let token = other.issue(&UserId::random()).expect("issue token");

        assert_eq!(
            issuer(Duration::minutes(60)).verify(&token).expect_err("forged"),
            TokenIssuerError::Invalid
        );
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("aaaa.bbbb.cccc")]
    fn garbage_tokens_are_invalid(#[case] token: &str) {
        assert_eq!(
            issuer(Duration::minutes(60)).verify(token).expect_err("garbage"),
            TokenIssuerError::Invalid
        );
    }

    #[rstest]
    fn tokens_with_a_non_uuid_subject_are_invalid() {
        let issuer = issuer(Duration::minutes(60));
        let now = Utc::now();
        let claims = Claims {
            sub: "not-a-uuid".into(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encode");

        assert_eq!(
            issuer.verify(&token).expect_err("bad subject"),
            TokenIssuerError::Invalid
        );
    }
}
