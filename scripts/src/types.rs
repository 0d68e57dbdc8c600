//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, Bytes, B256},
};

use crate::constants::{DEFAULT_INITIALIZER, PAYMENT_SETTLEMENT_CONTRACT};

/// A request to deploy a contract behind an upgradeable proxy
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentRequest {
    /// The name of the contract artifact to deploy
    pub contract_name: String,
    /// The arguments passed to the initializer, in order
    pub constructor_args: Vec<String>,
    /// The name of the initializer invoked through the proxy
    pub initializer: String,
}

impl DeploymentRequest {
    /// A request deploying the `PaymentSettlement` contract.
    ///
    /// The initializer takes its arguments in the order
    /// `[sibTel, stablecoin, centralAuthority]`.
    pub fn payment_settlement(
        sib_tel: impl Into<String>,
        stablecoin: impl Into<String>,
        central_authority: impl Into<String>,
    ) -> Self {
        Self {
            contract_name: PAYMENT_SETTLEMENT_CONTRACT.to_string(),
            constructor_args: vec![sib_tel.into(), stablecoin.into(), central_authority.into()],
            initializer: DEFAULT_INITIALIZER.to_string(),
        }
    }
}

/// A request to point an existing proxy at a new implementation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeRequest {
    /// The address of the proxy, as supplied by the operator
    pub proxy_address: String,
    /// The name of the new contract version's artifact
    pub new_contract_name: String,
    /// Calldata with which to call the new implementation during the upgrade
    pub call_data: Option<Bytes>,
}

/// A compiled contract, resolved by name
#[derive(Clone, Debug)]
pub struct ContractArtifact {
    /// The contract name
    pub name: String,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The contract creation bytecode
    pub bytecode: Bytes,
}

/// Options for a proxy deployment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployProxyOptions {
    /// The name of the initializer invoked through the proxy
    pub initializer: String,
}

impl Default for DeployProxyOptions {
    fn default() -> Self {
        Self {
            initializer: DEFAULT_INITIALIZER.to_string(),
        }
    }
}

/// Options for a proxy upgrade
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpgradeProxyOptions {
    /// Calldata with which to call the new implementation
    pub call: Option<Bytes>,
}

/// The flavor of an EIP-1967 proxy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProxyKind {
    /// The proxy is upgraded through its implementation (`upgradeToAndCall`)
    Uups,
    /// The proxy is upgraded through a separate `ProxyAdmin` contract
    Transparent,
}

impl Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyKind::Uups => write!(f, "uups"),
            ProxyKind::Transparent => write!(f, "transparent"),
        }
    }
}

/// A deployed or upgraded proxy
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyHandle {
    /// The address of the proxy
    pub address: Address,
    /// The implementation the proxy delegates to
    pub implementation: Address,
    /// The proxy admin contract, if the proxy is transparent
    pub admin: Option<Address>,
    /// The flavor of the proxy
    pub kind: ProxyKind,
    /// The hash of the transaction that deployed or upgraded the proxy
    pub transaction_hash: Option<B256>,
}
