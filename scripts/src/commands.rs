//! Implementations of the deploy & upgrade scripts

use std::path::Path;

use tracing::info;

use crate::{
    errors::ScriptError,
    types::{
        DeployProxyOptions, DeploymentRequest, ProxyHandle, UpgradeProxyOptions, UpgradeRequest,
    },
    upgrades::UpgradesApi,
    utils::{implementation_key, proxy_key, write_deployed_address},
};

/// Deploy the requested contract behind a new upgradeable proxy.
///
/// Resolves once the deployment is confirmed, having printed the proxy address.
pub async fn deploy_proxy(
    request: DeploymentRequest,
    upgrades: &impl UpgradesApi,
) -> Result<ProxyHandle, ScriptError> {
    let deployer = upgrades.signer().await?;
    info!("Deploying contracts with the account: {deployer:#x}");

    let artifact = upgrades.contract_artifact(&request.contract_name).await?;
    info!("Contract factory loaded: {}", artifact.name);

    info!("Deploying {} contract as a proxy...", artifact.name);
    let options = DeployProxyOptions {
        initializer: request.initializer,
    };
    let proxy = upgrades
        .deploy_proxy(&artifact, &request.constructor_args, &options)
        .await?;

    println!(
        "{} proxy contract deployed at {:#x}",
        request.contract_name, proxy.address
    );
    info!(
        "{} proxy points at implementation {:#x}",
        proxy.kind, proxy.implementation
    );

    Ok(proxy)
}

/// Upgrade the requested proxy to a new contract version
pub async fn upgrade_proxy(
    request: UpgradeRequest,
    upgrades: &impl UpgradesApi,
) -> Result<ProxyHandle, ScriptError> {
    let upgrader = upgrades.signer().await?;
    info!("Upgrading contracts with the account: {upgrader:#x}");

    let artifact = upgrades
        .contract_artifact(&request.new_contract_name)
        .await?;

    info!(
        "Upgrading proxy contract at address: {}",
        request.proxy_address
    );
    let options = UpgradeProxyOptions {
        call: request.call_data,
    };
    let proxy = upgrades
        .upgrade_proxy(&request.proxy_address, &artifact, &options)
        .await?;

    println!(
        "Proxy {:#x} upgraded to {} at {:#x}",
        proxy.address, request.new_contract_name, proxy.implementation
    );

    Ok(proxy)
}

/// Record a deployed proxy & its implementation under `contract`
pub fn record_deployment(
    deployments_path: &Path,
    contract: &str,
    proxy: &ProxyHandle,
) -> Result<(), ScriptError> {
    write_deployed_address(deployments_path, &proxy_key(contract), proxy.address)?;
    write_deployed_address(
        deployments_path,
        &implementation_key(contract),
        proxy.implementation,
    )?;
    info!(
        "Recorded {contract} deployment in {}",
        deployments_path.display()
    );

    Ok(())
}
