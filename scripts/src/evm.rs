//! An implementation of the proxy management capability against an EVM node

use std::path::PathBuf;

use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, Bytes, B256, U256},
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use tracing::{debug, info};

use crate::{
    artifacts::load_artifact,
    constants::{
        NUM_DEPLOY_CONFIRMATIONS, PROXY_ADMIN_STORAGE_SLOT, PROXY_CONTRACT,
        PROXY_IMPLEMENTATION_STORAGE_SLOT, UPGRADE_INTERFACE_VERSION_AND_CALL_ONLY,
    },
    errors::ScriptError,
    solidity::{IProxyAdmin, IUUPSUpgradeable, IUpgradeInterface},
    types::{ContractArtifact, DeployProxyOptions, ProxyHandle, ProxyKind, UpgradeProxyOptions},
    upgrades::UpgradesApi,
    utils::{
        address_from_slot, initializer_calldata, parse_address, proxy_creation_code, setup_client,
        Client,
    },
};

/// Deploys and upgrades EIP-1967 proxies through an RPC node, resolving
/// artifacts from a local build directory
pub struct EvmUpgrades {
    /// The signing client
    client: Client,
    /// The address of the signer attached to the client
    signer_address: Address,
    /// The directory holding compiled contract artifacts
    artifacts_dir: PathBuf,
}

impl EvmUpgrades {
    /// Connect to the node at `rpc_url`, signing with `priv_key`
    pub async fn new(
        priv_key: &str,
        rpc_url: &str,
        artifacts_dir: impl Into<PathBuf>,
    ) -> Result<Self, ScriptError> {
        let (client, signer_address) = setup_client(priv_key, rpc_url).await?;
        Ok(Self::from_client(client, signer_address, artifacts_dir))
    }

    /// Wrap an existing client
    pub fn from_client(
        client: Client,
        signer_address: Address,
        artifacts_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            signer_address,
            artifacts_dir: artifacts_dir.into(),
        }
    }

    /// Send a contract creation transaction, returning the address of the
    /// created contract and the transaction hash once mined
    async fn deploy_code(&self, code: Bytes) -> Result<(Address, B256), ScriptError> {
        let tx = TransactionRequest::default().with_deploy_code(code);
        let pending = self
            .client
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        let receipt = wait_for_receipt(pending)
            .await
            .map_err(ScriptError::ContractDeployment)?;
        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "no contract created by {:#x}",
                receipt.transaction_hash
            ))
        })?;

        Ok((address, receipt.transaction_hash))
    }

    /// Read the address stored in the given slot of `address`
    async fn read_address_slot(
        &self,
        address: Address,
        slot: B256,
    ) -> Result<Address, ScriptError> {
        let word = self
            .client
            .get_storage_at(address, U256::from_be_bytes(slot.0))
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        Ok(address_from_slot(word))
    }

    /// Inspect the EIP-1967 slots of the proxy at `address`
    async fn proxy_handle(
        &self,
        address: Address,
        transaction_hash: Option<B256>,
    ) -> Result<ProxyHandle, ScriptError> {
        let implementation = self
            .read_address_slot(address, PROXY_IMPLEMENTATION_STORAGE_SLOT)
            .await?;
        if implementation == Address::ZERO {
            return Err(ScriptError::NotAProxy(format!(
                "{address:#x} has no implementation"
            )));
        }

        let admin = self
            .read_address_slot(address, PROXY_ADMIN_STORAGE_SLOT)
            .await?;
        let (admin, kind) = if admin == Address::ZERO {
            (None, ProxyKind::Uups)
        } else {
            (Some(admin), ProxyKind::Transparent)
        };

        Ok(ProxyHandle {
            address,
            implementation,
            admin,
            kind,
            transaction_hash,
        })
    }

    /// Read the upgrade interface version of the contract at `address`,
    /// `None` if it does not expose one
    async fn upgrade_interface_version(&self, address: Address) -> Option<String> {
        let contract = IUpgradeInterface::new(address, self.client.clone());
        let version = contract.UPGRADE_INTERFACE_VERSION().call().await;

        match version {
            Ok(version) => Some(version),
            Err(e) => {
                debug!("No upgrade interface version at {address:#x}: {e}");
                None
            }
        }
    }
}

impl UpgradesApi for EvmUpgrades {
    async fn signer(&self) -> Result<Address, ScriptError> {
        let balance = self
            .client
            .get_balance(self.signer_address)
            .await
            .map_err(|e| ScriptError::Signer(e.to_string()))?;

        if balance.is_zero() {
            return Err(ScriptError::Signer(format!(
                "account {:#x} has no funds",
                self.signer_address
            )));
        }

        Ok(self.signer_address)
    }

    async fn contract_artifact(&self, name: &str) -> Result<ContractArtifact, ScriptError> {
        load_artifact(&self.artifacts_dir, name)
    }

    async fn deploy_proxy(
        &self,
        artifact: &ContractArtifact,
        args: &[String],
        options: &DeployProxyOptions,
    ) -> Result<ProxyHandle, ScriptError> {
        // Prepare everything that can fail locally before sending any transaction
        let init_data = initializer_calldata(&artifact.abi, &options.initializer, args)?;
        let proxy_artifact = load_artifact(&self.artifacts_dir, PROXY_CONTRACT)?;

        let (implementation, _) = self.deploy_code(artifact.bytecode.clone()).await?;
        info!(
            "{} implementation deployed at {:#x}",
            artifact.name, implementation
        );

        let creation_code = proxy_creation_code(&proxy_artifact, implementation, init_data)?;
        let (proxy, tx_hash) = self.deploy_code(creation_code).await?;
        debug!("Proxy deployed in transaction {tx_hash:#x}");

        let handle = self.proxy_handle(proxy, Some(tx_hash)).await?;
        check_implementation(&handle, implementation)
            .map_err(ScriptError::ContractDeployment)?;

        Ok(handle)
    }

    async fn upgrade_proxy(
        &self,
        proxy_address: &str,
        artifact: &ContractArtifact,
        options: &UpgradeProxyOptions,
    ) -> Result<ProxyHandle, ScriptError> {
        let proxy = parse_address(proxy_address)?;
        let current = self.proxy_handle(proxy, None).await?;
        debug!(
            "Proxy {proxy:#x} ({}) currently points at {:#x}",
            current.kind, current.implementation
        );

        let (implementation, _) = self.deploy_code(artifact.bytecode.clone()).await?;
        info!(
            "{} implementation deployed at {:#x}",
            artifact.name, implementation
        );

        // Pre-5.0 proxies force a delegatecall on `*AndCall`, even with empty data
        let pending = match current.admin {
            Some(admin) => {
                let version = self.upgrade_interface_version(admin).await;
                let proxy_admin = IProxyAdmin::new(admin, self.client.clone());
                match upgrade_and_call_data(version.as_deref(), options.call.clone()) {
                    Some(data) => {
                        proxy_admin
                            .upgradeAndCall(proxy, implementation, data)
                            .send()
                            .await
                    }
                    None => proxy_admin.upgrade(proxy, implementation).send().await,
                }
            }
            None => {
                let version = self.upgrade_interface_version(proxy).await;
                let uups = IUUPSUpgradeable::new(proxy, self.client.clone());
                match upgrade_and_call_data(version.as_deref(), options.call.clone()) {
                    Some(data) => uups.upgradeToAndCall(implementation, data).send().await,
                    None => uups.upgradeTo(implementation).send().await,
                }
            }
        }
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        let receipt = wait_for_receipt(pending)
            .await
            .map_err(ScriptError::ContractInteraction)?;

        let upgraded = self
            .proxy_handle(proxy, Some(receipt.transaction_hash))
            .await?;
        check_implementation(&upgraded, implementation)
            .map_err(ScriptError::ContractInteraction)?;

        Ok(upgraded)
    }
}

/// The calldata of an `*AndCall` upgrade, or `None` if the plain upgrade
/// entrypoint is to be used.
///
/// Contracts at upgrade interface version 5.0.0 only expose `*AndCall`, with
/// empty calldata standing in for no call.
fn upgrade_and_call_data(interface_version: Option<&str>, call: Option<Bytes>) -> Option<Bytes> {
    if interface_version == Some(UPGRADE_INTERFACE_VERSION_AND_CALL_ONLY) {
        return Some(call.unwrap_or_default());
    }

    call
}

/// Check that a proxy points at the expected implementation
fn check_implementation(proxy: &ProxyHandle, expected: Address) -> Result<(), String> {
    if proxy.implementation != expected {
        return Err(format!(
            "proxy {:#x} points at {:#x} rather than {expected:#x}",
            proxy.address, proxy.implementation
        ));
    }

    Ok(())
}

/// Wait for a pending transaction to be confirmed, failing if it reverted
async fn wait_for_receipt(
    pending: PendingTransactionBuilder<Ethereum>,
) -> Result<TransactionReceipt, String> {
    let receipt = pending
        .with_required_confirmations(NUM_DEPLOY_CONFIRMATIONS)
        .get_receipt()
        .await
        .map_err(|e| e.to_string())?;

    if !receipt.status() {
        return Err(format!(
            "transaction {:#x} reverted",
            receipt.transaction_hash
        ));
    }

    Ok(receipt)
}
