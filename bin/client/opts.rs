use clap::Parser;

const DESCRIPTION: &str = r#"
The Granary Client

Granary is a permission directory: a catalog of named permissions and the
grant sets of the identities that hold them. This program provides tools for
querying a Granary server.
"#;

#[derive(Parser)]
#[clap(name = "granary", version = clap::crate_version!(), about = DESCRIPTION)]
pub struct Opts {
    #[clap(
        short = 's',
        long = "server",
        env = "GRANARY_URL",
        help = "The address of the granary server. For the default local server, this should be http://localhost:8080"
    )]
    pub server_url: String,
    #[clap(
        short = 't',
        long = "token",
        env = "GRANARY_TOKEN",
        hide_env_values = true,
        help = "The bearer token to authenticate with. Mutually exclusive with --user"
    )]
    pub token: Option<String>,
    #[clap(
        short = 'u',
        long = "user",
        env = "GRANARY_USER",
        conflicts_with = "token",
        help = "The login to authenticate with using HTTP basic auth. Requires --password"
    )]
    pub user: Option<String>,
    #[clap(
        short = 'p',
        long = "password",
        env = "GRANARY_PASSWORD",
        hide_env_values = true,
        requires = "user",
        help = "The password for --user"
    )]
    pub password: Option<String>,

    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Parser)]
pub enum SubCommand {
    #[clap(name = "list", about = "List the full permission catalog")]
    List(List),
    #[clap(
        name = "whoami-permissions",
        about = "List the permission names granted to the calling identity"
    )]
    WhoamiPermissions(WhoamiPermissions),
}

#[derive(Parser)]
pub struct List {
    #[clap(
        long = "json",
        help = "Print the raw JSON response instead of one name per line"
    )]
    pub json: bool,
}

#[derive(Parser)]
pub struct WhoamiPermissions {
    #[clap(
        long = "json",
        help = "Print the raw JSON response instead of one name per line"
    )]
    pub json: bool,
}
