use clap::Parser;
use tokio::io::AsyncWriteExt;

use granary::client::{
    tokens::{HttpBasic, LongLivedToken, NoToken, TokenManager},
    Client, ClientError, Result,
};

mod opts;

use opts::*;

#[tokio::main]
async fn main() -> std::result::Result<(), ClientError> {
    let opts = opts::Opts::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match (opts.token, opts.user) {
        (Some(token), _) => {
            run(
                Client::new(&opts.server_url, LongLivedToken::new(&token))?,
                opts.subcmd,
            )
            .await
        }
        (None, Some(user)) => {
            let password = opts.password.unwrap_or_default();
            run(
                Client::new(&opts.server_url, HttpBasic::new(&user, &password))?,
                opts.subcmd,
            )
            .await
        }
        (None, None) => run(Client::new(&opts.server_url, NoToken)?, opts.subcmd).await,
    }
}

async fn run<T: TokenManager>(client: Client<T>, subcmd: SubCommand) -> Result<()> {
    match subcmd {
        SubCommand::List(list_opts) => {
            let catalog = client.list_permissions().await?;
            if list_opts.json {
                print_json(&catalog).await?;
            } else {
                for perm in catalog {
                    println!("{}", perm.name);
                }
            }
        }
        SubCommand::WhoamiPermissions(whoami_opts) => {
            let grants = client.list_permissions_for_current_user().await?;
            if whoami_opts.json {
                print_json(&grants).await?;
            } else {
                for name in grants {
                    println!("{}", name);
                }
            }
        }
    }
    Ok(())
}

async fn print_json<T: serde::Serialize>(val: &T) -> Result<()> {
    let raw = serde_json::to_vec_pretty(val)?;
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(&raw)
        .await
        .map_err(|e| ClientError::Other(e.to_string()))?;
    stdout
        .write_all(b"\n")
        .await
        .map_err(|e| ClientError::Other(e.to_string()))?;
    Ok(())
}
