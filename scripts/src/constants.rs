//! Constants used in the deploy & upgrade scripts

use alloy::primitives::{b256, B256};

// ------------
// | Defaults |
// ------------

/// The default RPC URL, a local development node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The default directory in which compiled contract artifacts are looked up
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The name of the contract deployed behind the proxy
pub const PAYMENT_SETTLEMENT_CONTRACT: &str = "PaymentSettlement";

/// The name of the contract version the proxy is upgraded to
pub const PAYMENT_SETTLEMENT_V2_CONTRACT: &str = "PaymentSettlementV2";

/// The initializer invoked through the proxy upon deployment
pub const DEFAULT_INITIALIZER: &str = "initialize";

/// The address of the SIBTEL token contract
pub const DEFAULT_SIB_TEL_ADDRESS: &str = "0xeBD4A6BC935E1FBB338efc2b82c4333Cd529e6b2";

/// The address of the stablecoin contract
pub const DEFAULT_STABLECOIN_ADDRESS: &str = "0xb9915C43421eE77bEe6c12EE49a5C94fee754Ae6";

/// The address of the central authority
pub const DEFAULT_CENTRAL_AUTHORITY_ADDRESS: &str = "0x8Be6Aa4A54b79075D486B154046c6c324A85B93E";

/// Placeholder for the proxy address to upgrade, must be replaced by the operator
pub const PLACEHOLDER_PROXY_ADDRESS: &str = "0xYourDeployedProxyAddress";

// -------------
// | Artifacts |
// -------------

/// The name of the proxy contract artifact deployed in front of implementations
pub const PROXY_CONTRACT: &str = "ERC1967Proxy";

/// The extension of a compiled contract artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The extension of the source directory an artifact is nested under
pub const SOLIDITY_EXTENSION: &str = "sol";

// ---------
// | Chain |
// ---------

/// The number of confirmations to wait for on each deployment or upgrade transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The storage slot containing the implementation address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address
pub const PROXY_IMPLEMENTATION_STORAGE_SLOT: B256 =
    b256!("0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc");

/// The storage slot containing the proxy admin contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: B256 =
    b256!("0xb53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103");

/// The upgrade interface version of upgradeable contracts that only expose
/// the `*AndCall` upgrade entrypoints
pub const UPGRADE_INTERFACE_VERSION_AND_CALL_ONLY: &str = "5.0.0";

/// The number of bytes stored in a single storage slot
pub const NUM_BYTES_STORAGE_SLOT: usize = 32;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

// ---------------
// | Deployments |
// ---------------

/// The deployments key in the deployments file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The suffix of a proxy contract's key in the deployments file
pub const PROXY_KEY_SUFFIX: &str = "Proxy";

/// The suffix of an implementation contract's key in the deployments file
pub const IMPLEMENTATION_KEY_SUFFIX: &str = "Implementation";

// -----------
// | Process |
// -----------

/// The exit status of a successful run
pub const EXIT_SUCCESS: i32 = 0;

/// The exit status of a failed run
pub const EXIT_FAILURE: i32 = 1;
