//! Various implementations and traits for handling credentials. These are used in the
//! [`Client`](super::Client) to apply the identity token when configured

use base64::Engine;
use reqwest::{header::HeaderValue, RequestBuilder};

use super::{ClientError, Result};
use crate::X_AUTHORIZATION_HEADER;

/// A trait that can be implemented by anything that can provide a valid credential for use in a
/// client. Implementors of this trait should ensure that any token refresh/validation is done as
/// part of applying the authentication header
#[async_trait::async_trait]
pub trait TokenManager {
    /// Adds the identity header to the request, returning the newly updated request builder or an
    /// error if there was a problem generating the credential
    async fn apply_auth_header(&self, builder: RequestBuilder) -> Result<RequestBuilder>;
}

/// A token manager that does nothing. For use when authentication is not enabled or anonymous
/// access is desired
#[derive(Clone, Default)]
pub struct NoToken;

#[async_trait::async_trait]
impl TokenManager for NoToken {
    async fn apply_auth_header(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        Ok(builder)
    }
}

/// A token manager for long lived bearer tokens (such as service account tokens). This will
/// simply configure the request to always send the provided token
#[derive(Clone)]
pub struct LongLivedToken {
    token: String,
}

impl LongLivedToken {
    /// Create a new LongLivedToken with the given token value
    pub fn new(token: &str) -> Self {
        LongLivedToken {
            token: token.to_owned(),
        }
    }
}

#[async_trait::async_trait]
impl TokenManager for LongLivedToken {
    async fn apply_auth_header(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let mut header_val = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| ClientError::Other(e.to_string()))?;
        header_val.set_sensitive(true);
        Ok(builder.header(X_AUTHORIZATION_HEADER, header_val))
    }
}

/// A token manager for HTTP basic credentials
#[derive(Clone)]
pub struct HttpBasic {
    login: String,
    password: String,
}

impl HttpBasic {
    pub fn new(login: &str, password: &str) -> Self {
        HttpBasic {
            login: login.to_owned(),
            password: password.to_owned(),
        }
    }
}

#[async_trait::async_trait]
impl TokenManager for HttpBasic {
    async fn apply_auth_header(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let data = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.login, self.password));
        let mut header_val = HeaderValue::from_str(&format!("Basic {}", data))
            .map_err(|e| ClientError::Other(e.to_string()))?;
        header_val.set_sensitive(true);
        Ok(builder.header(X_AUTHORIZATION_HEADER, header_val))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_applied_headers() {
        let client = reqwest::Client::new();

        let req = LongLivedToken::new("abc123")
            .apply_auth_header(client.get("http://localhost:8080/permissions/list"))
            .await
            .expect("token should apply")
            .build()
            .expect("request should build");
        assert_eq!(
            "Bearer abc123",
            req.headers()
                .get(X_AUTHORIZATION_HEADER)
                .expect("identity header should be set")
                .to_str()
                .expect("identity header should be ascii")
        );

        let req = HttpBasic::new("admin", "sw0rdf1sh")
            .apply_auth_header(client.get("http://localhost:8080/permissions/list"))
            .await
            .expect("credentials should apply")
            .build()
            .expect("request should build");
        assert_eq!(
            "Basic YWRtaW46c3cwcmRmMXNo",
            req.headers()
                .get(X_AUTHORIZATION_HEADER)
                .expect("identity header should be set")
                .to_str()
                .expect("identity header should be ascii")
        );

        let req = NoToken
            .apply_auth_header(client.get("http://localhost:8080/permissions/list"))
            .await
            .expect("no-op should apply")
            .build()
            .expect("request should build");
        assert!(req.headers().get(X_AUTHORIZATION_HEADER).is_none());
    }
}
