//! An authenticator that validates locally issued bearer tokens.
//!
//! Tokens are HS256 JWTs signed with a shared secret; the `sub` claim carries
//! the login of the identity. This is the `resolveIdentity` seam for
//! deployments that mint their own tokens rather than delegating to an
//! external issuer.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use super::Authenticator;
use crate::authz::Authorizable;

/// HTTP header prefix
const BEARER_PREFIX: &str = "Bearer ";

#[derive(Deserialize)]
struct Claims {
    sub: String,
}

/// An authenticator for HS256 JWTs signed with a shared secret
#[derive(Clone)]
pub struct BearerToken {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl BearerToken {
    /// Constructs an authenticator that accepts tokens signed with the given secret. Expiry
    /// (`exp`) is required and validated
    pub fn new(secret: &[u8]) -> Self {
        BearerToken {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait::async_trait]
impl Authenticator for BearerToken {
    type Item = TokenUser;

    async fn authenticate(&self, auth_data: &str) -> anyhow::Result<Self::Item> {
        let token = match auth_data.strip_prefix(BEARER_PREFIX) {
            Some(t) if !t.trim().is_empty() => t.trim(),
            _ => anyhow::bail!("Wrong auth type. Only Bearer tokens are supported"),
        };
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(TokenUser {
            login: data.claims.sub,
        })
    }
}

/// The identity resolved from a validated bearer token
#[derive(Debug)]
pub struct TokenUser {
    login: String,
}

impl Authorizable for TokenUser {
    fn login(&self) -> &str {
        self.login.as_ref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use jsonwebtoken::{EncodingKey, Header};

    const SECRET: &[u8] = b"under-the-doormat";

    #[derive(serde::Serialize)]
    struct MintClaims {
        sub: String,
        exp: u64,
    }

    fn mint(secret: &[u8], login: &str, lifetime: Duration) -> String {
        let exp = (SystemTime::now() + lifetime)
            .duration_since(UNIX_EPOCH)
            .expect("time should be sane")
            .as_secs();
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &MintClaims {
                sub: login.to_owned(),
                exp,
            },
            &EncodingKey::from_secret(secret),
        )
        .expect("token should encode")
    }

    #[tokio::test]
    async fn test_valid_token_resolves_login() {
        let authn = BearerToken::new(SECRET);
        let header = format!("Bearer {}", mint(SECRET, "admin", Duration::from_secs(60)));
        let user = authn
            .authenticate(&header)
            .await
            .expect("token should authenticate");
        assert_eq!("admin", user.login());
    }

    #[tokio::test]
    async fn test_wrong_secret_is_rejected() {
        let authn = BearerToken::new(SECRET);
        let header = format!(
            "Bearer {}",
            mint(b"some-other-secret", "admin", Duration::from_secs(60))
        );
        authn
            .authenticate(&header)
            .await
            .expect_err("token signed with another secret should fail");
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let authn = BearerToken::new(SECRET);
        // A token that expired an hour before it was minted
        let exp = (SystemTime::now() - Duration::from_secs(3600))
            .duration_since(UNIX_EPOCH)
            .expect("time should be sane")
            .as_secs();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &MintClaims {
                sub: "admin".to_owned(),
                exp,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .expect("token should encode");
        authn
            .authenticate(&format!("Bearer {}", token))
            .await
            .expect_err("expired token should fail");
    }

    #[tokio::test]
    async fn test_missing_or_wrong_scheme_is_rejected() {
        let authn = BearerToken::new(SECRET);
        authn
            .authenticate("")
            .await
            .expect_err("empty credentials should fail");
        authn
            .authenticate("Basic YWRtaW46aHVudGVyMg==")
            .await
            .expect_err("non-bearer credentials should fail");
        authn
            .authenticate("Bearer ")
            .await
            .expect_err("empty token should fail");
    }
}
