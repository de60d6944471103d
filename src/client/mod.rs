//! Client implementation for consuming the permissions API. Although written in Rust, it is not
//! specific to this server implementation. It is meant to consume any endpoint that follows the
//! same contract.

mod error;
pub mod tokens;

use std::collections::BTreeSet;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use tracing::{instrument, trace};
use url::Url;

use crate::{ErrorResponse, Permission, PERMISSION_LIST, ROUTING_KEY_HEADER};
use tokens::TokenManager;

pub use error::ClientError;

/// A shorthand `Result` type that always uses `ClientError` as its error variant
pub type Result<T> = std::result::Result<T, ClientError>;

pub const LIST_ENDPOINT: &str = "permissions/list";
pub const LIST_FOR_CURRENT_USER_ENDPOINT: &str = "permissions/list/for/current/user";

const JSON_MIME_TYPE: &str = "application/json";

/// A client type for interacting with a permissions API, generic over the credential used for
/// requests
#[derive(Clone)]
pub struct Client<T> {
    client: HttpClient,
    base_url: Url,
    token_manager: T,
}

/// A builder for setting up a `Client`. Created using `Client::builder`
pub struct ClientBuilder {
    http2_prior_knowledge: bool,
    danger_accept_invalid_certs: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            http2_prior_knowledge: false,
            danger_accept_invalid_certs: false,
        }
    }
}

impl ClientBuilder {
    /// Controls whether the client assumes HTTP/2 or attempts to negotiate it. Defaults to false.
    pub fn http2_prior_knowledge(mut self, http2_prior_knowledge: bool) -> Self {
        self.http2_prior_knowledge = http2_prior_knowledge;
        self
    }

    /// Controls whether the client accepts invalid certificates. The default is to reject invalid
    /// certificates. It is sometimes necessary to set this option in dev-test situations where you
    /// may be working with self-signed certificates or the like. Defaults to false.
    pub fn danger_accept_invalid_certs(mut self, danger_accept_invalid_certs: bool) -> Self {
        self.danger_accept_invalid_certs = danger_accept_invalid_certs;
        self
    }

    /// Returns a new Client with the given URL, configured using the set options and applying
    /// credentials through the given token manager on every request.
    ///
    /// This URL should be the FQDN of the server. Will return an error if the URL is not valid
    pub fn build<T: TokenManager>(self, base_url: &str, token_manager: T) -> Result<Client<T>> {
        let base_parsed = parse_base_url(base_url)?;
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(JSON_MIME_TYPE));

        let mut builder = HttpClient::builder();
        if self.http2_prior_knowledge {
            builder = builder.http2_prior_knowledge();
        }
        if self.danger_accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Other(e.to_string()))?;
        Ok(Client {
            client,
            base_url: base_parsed,
            token_manager,
        })
    }
}

impl<T: TokenManager> Client<T> {
    /// Returns a new Client with the default configuration. Equivalent to
    /// `Client::builder().build(base_url, token_manager)`
    pub fn new(base_url: &str, token_manager: T) -> Result<Self> {
        ClientBuilder::default().build(base_url, token_manager)
    }

    /// Returns a [`ClientBuilder`](ClientBuilder) for configuring a client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Fetches the full permission catalog. Requires an identity holding `permission.list`
    #[instrument(level = "trace", skip(self))]
    pub async fn list_permissions(&self) -> Result<Vec<Permission>> {
        let resp = self.authorized_get(LIST_ENDPOINT).await?;
        let resp = unwrap_status(resp).await?;
        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }

    /// Fetches the permission names granted to the calling identity. Requires an identity
    /// holding `permission.list`
    #[instrument(level = "trace", skip(self))]
    pub async fn list_permissions_for_current_user(&self) -> Result<BTreeSet<String>> {
        let resp = self.authorized_get(LIST_FOR_CURRENT_USER_ENDPOINT).await?;
        let resp = unwrap_status(resp).await?;
        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }

    async fn authorized_get(&self, endpoint: &str) -> Result<reqwest::Response> {
        // The join is infallible for our fixed endpoint strings once the base URL parsed
        let url = self.base_url.join(endpoint)?;
        trace!(%url, "Sending GET request");
        let req = self
            .client
            .get(url)
            .header(ROUTING_KEY_HEADER, PERMISSION_LIST);
        let req = self.token_manager.apply_auth_header(req).await?;
        Ok(req.send().await?)
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    // Url::join replaces the last path segment unless the base ends with a slash
    Ok(Url::parse(&format!(
        "{}/",
        base_url.trim_end_matches('/')
    ))?)
}

async fn unwrap_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    match resp.status() {
        StatusCode::OK => Ok(resp),
        // The server collapses unauthenticated and forbidden into 403, but tolerate servers
        // that surface 401 for the former
        StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
        s if s.is_server_error() => Err(ClientError::ServerError(message_from_body(resp).await)),
        s => Err(ClientError::InvalidRequest {
            status_code: s,
            message: message_from_body(resp).await,
        }),
    }
}

async fn message_from_body(resp: reqwest::Response) -> Option<String> {
    let bytes = resp.bytes().await.ok()?;
    serde_json::from_slice::<ErrorResponse>(&bytes)
        .ok()
        .map(|e| e.error)
}
