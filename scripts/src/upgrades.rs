//! The proxy management capability the deploy & upgrade scripts are written against

use alloy::primitives::Address;

use crate::{
    errors::ScriptError,
    types::{ContractArtifact, DeployProxyOptions, ProxyHandle, UpgradeProxyOptions},
};

/// Deploys and upgrades contracts behind upgradeable proxies.
///
/// Each method resolves only once the relevant transactions are confirmed.
#[allow(async_fn_in_trait)]
pub trait UpgradesApi {
    /// The account used to send transactions
    async fn signer(&self) -> Result<Address, ScriptError>;

    /// Resolve a compiled contract by name
    async fn contract_artifact(&self, name: &str) -> Result<ContractArtifact, ScriptError>;

    /// Deploy `artifact` behind a new proxy, invoking the initializer named in
    /// `options` with `args` through the proxy
    async fn deploy_proxy(
        &self,
        artifact: &ContractArtifact,
        args: &[String],
        options: &DeployProxyOptions,
    ) -> Result<ProxyHandle, ScriptError>;

    /// Deploy `artifact` and point the proxy at `proxy_address` to it
    async fn upgrade_proxy(
        &self,
        proxy_address: &str,
        artifact: &ContractArtifact,
        options: &UpgradeProxyOptions,
    ) -> Result<ProxyHandle, ScriptError>;
}
