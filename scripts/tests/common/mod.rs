//! A mocked proxy management capability recording the calls made to it

#![allow(dead_code)]

use std::{env, fs, path::PathBuf, sync::Mutex};

use alloy::{
    json_abi::JsonAbi,
    primitives::{address, Address, Bytes},
};
use rand::{thread_rng, Rng};
use scripts::{
    errors::ScriptError,
    types::{ContractArtifact, DeployProxyOptions, ProxyHandle, ProxyKind, UpgradeProxyOptions},
    upgrades::UpgradesApi,
    utils::parse_address,
};

/// The account the mock signs with
pub const SIGNER: Address = address!("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");

/// A call made to the mock
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    /// `signer`
    Signer,
    /// `contract_artifact`
    Artifact(String),
    /// `deploy_proxy`
    Deploy {
        /// The artifact deployed
        contract: String,
        /// The initializer arguments
        args: Vec<String>,
        /// The initializer name
        initializer: String,
    },
    /// `upgrade_proxy`
    Upgrade {
        /// The proxy address as given
        proxy: String,
        /// The new artifact
        contract: String,
        /// The upgrade calldata
        call: Option<Bytes>,
    },
}

/// A proxy management capability with no chain behind it
#[derive(Default)]
pub struct MockUpgrades {
    /// The calls made so far
    calls: Mutex<Vec<Call>>,
    /// If set, transactions revert with this reason
    revert: Option<String>,
    /// Whether the signer has no funds
    unfunded: bool,
    /// Artifacts that were never compiled
    missing: Vec<String>,
}

impl MockUpgrades {
    /// A mock under which every call succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock under which every transaction reverts
    pub fn reverting(reason: &str) -> Self {
        Self {
            revert: Some(reason.to_string()),
            ..Default::default()
        }
    }

    /// A mock whose signer has no funds
    pub fn unfunded() -> Self {
        Self {
            unfunded: true,
            ..Default::default()
        }
    }

    /// A mock lacking the artifact for `name`
    pub fn missing_artifact(name: &str) -> Self {
        Self {
            missing: vec![name.to_string()],
            ..Default::default()
        }
    }

    /// The calls made so far
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// The deploy & upgrade calls made so far
    pub fn transactions(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Deploy { .. } | Call::Upgrade { .. }))
            .collect()
    }

    /// Record a call
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl UpgradesApi for MockUpgrades {
    async fn signer(&self) -> Result<Address, ScriptError> {
        self.record(Call::Signer);
        if self.unfunded {
            return Err(ScriptError::Signer("account has no funds".to_string()));
        }

        Ok(SIGNER)
    }

    async fn contract_artifact(&self, name: &str) -> Result<ContractArtifact, ScriptError> {
        self.record(Call::Artifact(name.to_string()));
        if self.missing.iter().any(|missing| missing == name) {
            let reason = format!("no artifact for `{name}`");
            return Err(ScriptError::ArtifactResolution(reason));
        }

        Ok(ContractArtifact {
            name: name.to_string(),
            abi: JsonAbi::default(),
            bytecode: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]),
        })
    }

    async fn deploy_proxy(
        &self,
        artifact: &ContractArtifact,
        args: &[String],
        options: &DeployProxyOptions,
    ) -> Result<ProxyHandle, ScriptError> {
        self.record(Call::Deploy {
            contract: artifact.name.clone(),
            args: args.to_vec(),
            initializer: options.initializer.clone(),
        });
        if let Some(reason) = &self.revert {
            return Err(ScriptError::ContractDeployment(reason.clone()));
        }

        Ok(ProxyHandle {
            address: random_address(),
            implementation: random_address(),
            admin: None,
            kind: ProxyKind::Uups,
            transaction_hash: None,
        })
    }

    async fn upgrade_proxy(
        &self,
        proxy_address: &str,
        artifact: &ContractArtifact,
        options: &UpgradeProxyOptions,
    ) -> Result<ProxyHandle, ScriptError> {
        self.record(Call::Upgrade {
            proxy: proxy_address.to_string(),
            contract: artifact.name.clone(),
            call: options.call.clone(),
        });
        let address = parse_address(proxy_address)?;
        if let Some(reason) = &self.revert {
            return Err(ScriptError::ContractInteraction(reason.clone()));
        }

        Ok(ProxyHandle {
            address,
            implementation: random_address(),
            admin: None,
            kind: ProxyKind::Uups,
            transaction_hash: None,
        })
    }
}

/// A fresh random address
pub fn random_address() -> Address {
    Address::from(thread_rng().gen::<[u8; 20]>())
}

/// A path in the temp directory at which no file exists yet
pub fn scratch_path(prefix: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("{prefix}-{}.json", thread_rng().gen::<u64>()));
    let _ = fs::remove_file(&path);
    path
}
