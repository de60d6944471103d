mod filters;
mod handlers;
mod reply;

pub mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::authn::Authenticator;
use crate::authz::Authorizer;
use crate::directory::PermissionDirectory;

pub(crate) const JSON_MIME_TYPE: &str = "application/json";

/// The configuration required for running with TLS enabled
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Returns a future that runs a server until it receives a SIGINT to stop. If optional TLS
/// configuration is given, the server will be configured to use TLS. Otherwise it will use plain
/// HTTP
pub async fn server<D, Authn, Authz>(
    directory: D,
    authn: Authn,
    authz: Authz,
    addr: impl Into<SocketAddr> + 'static,
    tls: Option<TlsConfig>,
) -> anyhow::Result<()>
where
    D: PermissionDirectory + Clone + Send + Sync + 'static,
    Authn: Authenticator + Clone + Send + Sync + 'static,
    Authz: Authorizer + Clone + Send + Sync + 'static,
{
    let api = routes::api(directory, authn, authz);

    let server = warp::serve(api);
    match tls {
        None => {
            server
                .try_bind_with_graceful_shutdown(addr, shutdown_signal())?
                .1
                .await
        }
        Some(config) => {
            server
                .tls()
                .key_path(config.key_path)
                .cert_path(config.cert_path)
                .bind_with_graceful_shutdown(addr, shutdown_signal())
                .1
                .await
        }
    };
    Ok(())
}

async fn shutdown_signal() {
    // Wait for the CTRL+C signal
    tokio::signal::ctrl_c()
        .await
        .expect("failed to setup signal handler");
}
