use std::process;

use clap::Parser;
use scripts::{
    cli::{parse_error_status, Cli},
    errors::ScriptError,
    evm::EvmUpgrades,
    types::ProxyHandle,
    utils::exit_status,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help & version go to stdout, argument errors to stderr
            let _ = e.print();
            process::exit(parse_error_status(&e));
        }
    };

    tracing_subscriber::fmt()
        .pretty()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let res = run(cli).await;
    if let Err(e) = &res {
        error!("{e}");
    }

    process::exit(exit_status(&res));
}

async fn run(cli: Cli) -> Result<ProxyHandle, ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        artifacts,
        deployments_path,
        command,
    } = cli;

    let upgrades = EvmUpgrades::new(&priv_key, &rpc_url, artifacts).await?;
    command.run(&upgrades, deployments_path.as_ref()).await
}
