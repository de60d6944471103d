use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::warn;

use granary::authn::{always::AlwaysAuthenticate, bearer::BearerToken, http_basic::HttpBasic};
use granary::authz::{always::AlwaysAuthorize, directory::DirectoryAuthorizer};
use granary::directory::file::FileDirectory;
use granary::server::{server, TlsConfig};

const DESCRIPTION: &str = r#"
The Granary Server

Granary is a permission directory: a catalog of named permissions and the
grant sets of the identities that hold them. This program runs the HTTP
frontend for a directory.
"#;

#[derive(Parser, serde::Deserialize, Default)]
#[clap(name = "granary-server", version = clap::crate_version!(), about = DESCRIPTION)]
struct Opts {
    #[clap(
        short = 'i',
        long = "address",
        env = "GRANARY_IP_ADDRESS_PORT",
        help = "the IP address and port to listen on [default: 127.0.0.1:8080]"
    )]
    address: Option<String>,
    #[clap(
        name = "directory_file",
        short = 'd',
        long = "directory",
        env = "GRANARY_DIRECTORY",
        help = "the path to the TOML file holding the permission catalog and grants [default: $XDG_CONFIG_HOME/granary/directory.toml]"
    )]
    directory_file: Option<PathBuf>,
    #[clap(
        name = "htpasswd",
        long = "htpasswd",
        env = "GRANARY_HTPASSWD",
        help = "the path to an htpasswd file of bcrypt credentials. If set, requests are authenticated with HTTP basic auth"
    )]
    htpasswd: Option<PathBuf>,
    #[clap(
        name = "token_secret",
        long = "token-secret",
        env = "GRANARY_TOKEN_SECRET",
        hide_env_values = true,
        help = "the shared secret for validating bearer tokens. If set (and --htpasswd is not), requests are authenticated as HS256 JWTs"
    )]
    token_secret: Option<String>,
    #[clap(
        name = "lookup_timeout_ms",
        long = "lookup-timeout-ms",
        env = "GRANARY_LOOKUP_TIMEOUT_MS",
        help = "the bound, in milliseconds, on the grant-set lookup during authorization [default: 500]"
    )]
    lookup_timeout_ms: Option<u64>,
    #[clap(
        name = "cert_path",
        short = 'c',
        long = "cert-path",
        env = "GRANARY_CERT_PATH",
        requires = "key_path",
        help = "the path to the TLS certificate to use. If set, --key-path must be set as well. If not set, the server will use HTTP"
    )]
    cert_path: Option<PathBuf>,
    #[clap(
        name = "key_path",
        short = 'k',
        long = "key-path",
        env = "GRANARY_KEY_PATH",
        requires = "cert_path",
        help = "the path to the TLS certificate key to use. If set, --cert-path must be set as well. If not set, the server will use HTTP"
    )]
    key_path: Option<PathBuf>,
    #[clap(
        name = "config_file",
        long = "config-path",
        help = "the path to a configuration file"
    )]
    config_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    // TODO: Allow log level setting outside of RUST_LOG (this is easier with this subscriber)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // load config file if it exists
    let config_file_path = match opts.config_file {
        Some(c) => c,
        None => default_config_file()
            .ok_or_else(|| anyhow::anyhow!("could not find a default config path"))?,
    };

    let config: Opts = load_toml(config_file_path).await.unwrap_or_else(|e| {
        warn!(error = %e, "No server.toml file loaded");
        Opts::default()
    });

    // find socket address
    //   1. cli options if set
    //   2. config file if set
    //   3. default
    let addr: SocketAddr = opts
        .address
        .or(config.address)
        .unwrap_or_else(|| String::from("127.0.0.1:8080"))
        .parse()?;

    // find directory file
    //   1. cli options if set
    //   2. config file if set
    //   3. default
    let directory_file: PathBuf = opts
        .directory_file
        .or(config.directory_file)
        .unwrap_or_else(|| default_config_dir().join("directory.toml"));

    let cert_path = opts.cert_path.or(config.cert_path);

    let key_path = opts.key_path.or(config.key_path);

    // Map doesn't work here because we've already moved data out of opts
    #[allow(clippy::manual_map)]
    let tls = match cert_path {
        None => None,
        Some(p) => Some(TlsConfig {
            cert_path: p,
            key_path: key_path.expect("--key-path should be set if --cert-path was set"),
        }),
    };

    let directory = FileDirectory::load(&directory_file).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to load permission directory from {}: {} HINT: Try the flag --directory",
            directory_file.display(),
            e
        )
    })?;

    let mut authz = DirectoryAuthorizer::new(directory.clone());
    if let Some(ms) = opts.lookup_timeout_ms.or(config.lookup_timeout_ms) {
        authz = authz.with_timeout(Duration::from_millis(ms));
    }

    tracing::info!(
        %addr,
        directory = %directory_file.display(),
        "Starting server"
    );

    let htpasswd = opts.htpasswd.or(config.htpasswd);
    let token_secret = opts.token_secret.or(config.token_secret);
    match (htpasswd, token_secret) {
        (Some(path), _) => {
            let authn = HttpBasic::from_file(&path).await.map_err(|e| {
                anyhow::anyhow!("Failed to load htpasswd file from {}: {}", path.display(), e)
            })?;
            server(directory, authn, authz, addr, tls).await
        }
        (None, Some(secret)) => {
            server(
                directory,
                BearerToken::new(secret.as_bytes()),
                authz,
                addr,
                tls,
            )
            .await
        }
        (None, None) => {
            warn!(
                "No authentication configured. All requests are treated as anonymous and allowed. \
                 Set --htpasswd or --token-secret for a production deployment"
            );
            server(directory, AlwaysAuthenticate, AlwaysAuthorize, addr, tls).await
        }
    }
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|v| v.join("granary/server.toml"))
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|v| v.join("granary/"))
        .unwrap_or_else(|| "./granary".into())
}

async fn load_toml<T>(file: PathBuf) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let raw_data = tokio::fs::read(&file)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read TOML file {}: {}", file.display(), e))?;
    let res = toml::from_slice::<T>(&raw_data)?;
    Ok(res)
}
