//! Command-line front-end for the Lockbox browser-based OIDC login flow.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lockbox_core::auth::{self, LoginOptions};
use lockbox_core::client::LockboxClient;
use tracing_subscriber::EnvFilter;

const LOGIN_HELP: &str = "\
The OIDC method logs in through your configured identity provider. The
provider must be configured as part of a role by the server operator.

Authenticate using role \"engineering\":

    $ lockbox login role=engineering
    Complete the login via your OIDC provider. Launching browser to:

        https://accounts.example.com/o/oauth2/v2/...

The default browser is opened for you to complete the login; alternatively,
visit the printed authorization URL directly.

Configuration keys:

  role=<string>
      Server role of type \"oidc\" to authenticate against.

  mount=<string>
      Path the OIDC auth method is mounted at (default: oidc).

  listenaddress=<string>
      Address to bind the callback listener to (default: localhost).

  port=<string>
      Local port for the OIDC callback listener (default: 8250).

  callbackmethod=<string>
      Scheme to use in the OIDC redirect_uri (default: http).

  callbackhost=<string>
      Host to use in the OIDC redirect_uri (default: localhost).

  callbackport=<string>
      Port to use in the OIDC redirect_uri (default: the value of port).
";

#[derive(Parser)]
#[command(name = "lockbox", version, about = "Lockbox credential server CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with the browser-based OIDC flow.
    #[command(after_long_help = LOGIN_HELP)]
    Login {
        /// Configuration as KEY=VALUE pairs (see --help for the keys).
        #[arg(value_name = "KEY=VALUE")]
        settings: Vec<String>,
        /// Print the authorization URL without launching a browser.
        #[arg(long)]
        no_browser: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Login {
            settings,
            no_browser,
        } => run_login(&settings, no_browser).await,
    }
}

async fn run_login(settings: &[String], no_browser: bool) -> Result<()> {
    let options = LoginOptions::from_map(&parse_settings(settings)?);

    let address = std::env::var("LOCKBOX_ADDR")
        .context("LOCKBOX_ADDR must point at your Lockbox server")?;
    let mut client = LockboxClient::new(&address)?;
    if let Ok(token) = std::env::var("LOCKBOX_TOKEN") {
        client = client.with_token(token);
    }

    let secret = auth::login(&client, &options, !no_browser, |url| {
        eprintln!("Complete the login via your OIDC provider. Launching browser to:\n\n    {url}\n");
        Ok(())
    })
    .await?;

    for warning in &secret.warnings {
        eprintln!("WARNING: {warning}");
    }

    match &secret.auth {
        Some(auth) => {
            println!("Success! You are now authenticated.");
            println!("token           {}", auth.client_token);
            println!("token_accessor  {}", auth.accessor);
            println!("token_policies  {}", auth.policies.join(", "));
            println!("lease_duration  {}s", auth.lease_duration);
            println!("renewable       {}", auth.renewable);
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&secret)?);
        }
    }
    Ok(())
}

fn parse_settings(pairs: &[String]) -> Result<HashMap<String, String>> {
    let mut settings = HashMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("invalid setting '{pair}'; expected KEY=VALUE");
        };
        settings.insert(key.trim().to_ascii_lowercase(), value.to_owned());
    }
    Ok(settings)
}
