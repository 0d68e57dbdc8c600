//! Definitions of CLI arguments and commands for the deploy & upgrade scripts

use std::path::PathBuf;

use clap::{error::ErrorKind, Args, Parser, Subcommand};

use crate::{
    commands::{deploy_proxy, record_deployment, upgrade_proxy},
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_CENTRAL_AUTHORITY_ADDRESS, DEFAULT_INITIALIZER,
        DEFAULT_RPC_URL, DEFAULT_SIB_TEL_ADDRESS, DEFAULT_STABLECOIN_ADDRESS, EXIT_FAILURE,
        EXIT_SUCCESS, PAYMENT_SETTLEMENT_CONTRACT, PAYMENT_SETTLEMENT_V2_CONTRACT,
        PLACEHOLDER_PROXY_ADDRESS,
    },
    errors::ScriptError,
    types::{DeploymentRequest, ProxyHandle, UpgradeRequest},
    upgrades::UpgradesApi,
    utils::{find_deployment_key, parse_addr_from_deployments_file, parse_calldata, proxy_key},
};

/// Deploy the payment settlement contract behind an upgradeable proxy, or upgrade it
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY", hide_env_values = true)]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Directory holding the compiled contract artifacts
    #[arg(short, long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Path to a JSON file in which deployed addresses are recorded
    #[arg(short, long)]
    pub deployments_path: Option<PathBuf>,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The scripts that can be run
#[derive(Subcommand)]
pub enum Command {
    /// Deploy a contract behind a new upgradeable proxy
    Deploy(DeployArgs),
    /// Upgrade an existing proxy to a new contract version
    Upgrade(UpgradeArgs),
}

impl Command {
    /// Run the script against the given proxy management capability,
    /// recording the result in the deployments file if one is given
    pub async fn run(
        self,
        upgrades: &impl UpgradesApi,
        deployments_path: Option<&PathBuf>,
    ) -> Result<ProxyHandle, ScriptError> {
        match self {
            Command::Deploy(args) => {
                let contract = args.contract.clone();
                let proxy = deploy_proxy(args.into(), upgrades).await?;
                if let Some(path) = deployments_path {
                    record_deployment(path, &contract, &proxy)?;
                }

                Ok(proxy)
            }
            Command::Upgrade(args) => {
                let deployment_key = args.deployment_key.clone();
                let contract = args.contract.clone();
                let request = args.into_request(deployments_path)?;
                let proxy = upgrade_proxy(request, upgrades).await?;
                if let Some(path) = deployments_path {
                    // Keep the proxy under the key it was deployed with
                    let key = match deployment_key {
                        Some(key) => Some(key),
                        None => find_deployment_key(path, proxy.address)?,
                    };
                    record_deployment(path, &key.unwrap_or(contract), &proxy)?;
                }

                Ok(proxy)
            }
        }
    }
}

/// Deploy a contract as an upgradeable proxy, calling its initializer
/// with the given token & authority addresses
#[derive(Args)]
pub struct DeployArgs {
    /// Name of the contract artifact to deploy
    #[arg(short, long, default_value = PAYMENT_SETTLEMENT_CONTRACT)]
    pub contract: String,

    /// SIBTEL token contract address in hex
    #[arg(long, default_value = DEFAULT_SIB_TEL_ADDRESS)]
    pub sib_tel: String,

    /// Stablecoin contract address in hex
    #[arg(long, default_value = DEFAULT_STABLECOIN_ADDRESS)]
    pub stablecoin: String,

    /// Central authority address in hex
    #[arg(long, default_value = DEFAULT_CENTRAL_AUTHORITY_ADDRESS)]
    pub central_authority: String,

    /// Name of the initializer called through the proxy
    #[arg(short, long, default_value = DEFAULT_INITIALIZER)]
    pub initializer: String,
}

impl From<DeployArgs> for DeploymentRequest {
    fn from(args: DeployArgs) -> Self {
        let mut request = DeploymentRequest::payment_settlement(
            args.sib_tel,
            args.stablecoin,
            args.central_authority,
        );
        request.contract_name = args.contract;
        request.initializer = args.initializer;
        request
    }
}

/// Upgrade a proxy to a new contract version
#[derive(Args)]
pub struct UpgradeArgs {
    /// Address of the proxy contract
    #[arg(long, default_value = PLACEHOLDER_PROXY_ADDRESS)]
    pub proxy: String,

    /// Name of the new contract version's artifact
    #[arg(short, long, default_value = PAYMENT_SETTLEMENT_V2_CONTRACT)]
    pub contract: String,

    /// Contract name under which the proxy was recorded in the deployments file,
    /// read in place of `--proxy`
    #[arg(long)]
    pub deployment_key: Option<String>,

    /// Optional calldata, in hex form, with which to
    /// call the new implementation when upgrading
    #[arg(long)]
    pub calldata: Option<String>,
}

impl UpgradeArgs {
    /// Build the upgrade request, reading the proxy address from the
    /// deployments file if a deployment key is given
    pub fn into_request(
        self,
        deployments_path: Option<&PathBuf>,
    ) -> Result<UpgradeRequest, ScriptError> {
        let proxy_address = match (self.deployment_key.as_deref(), deployments_path) {
            (Some(key), Some(path)) => {
                let address = parse_addr_from_deployments_file(path, &proxy_key(key))?;
                format!("{address:#x}")
            }
            (Some(_), None) => {
                return Err(ScriptError::ReadDeployments(
                    "a deployment key requires a deployments file".to_string(),
                ));
            }
            (None, _) => self.proxy,
        };

        Ok(UpgradeRequest {
            proxy_address,
            new_contract_name: self.contract,
            call_data: parse_calldata(self.calldata.as_deref())?,
        })
    }
}

/// The exit status for a failure to parse the command line.
///
/// Help & version requests succeed, every other argument error is a failed run.
pub fn parse_error_status(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_SUCCESS,
        _ => EXIT_FAILURE,
    }
}
