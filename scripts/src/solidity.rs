//! Definitions of Solidity functions called during upgrades

use alloy::sol;

sol! {
    /// The upgrade entrypoints of a UUPS implementation, called through its proxy
    #[sol(rpc)]
    interface IUUPSUpgradeable {
        function upgradeTo(address newImplementation) external;
        function upgradeToAndCall(address newImplementation, bytes memory data) external payable;
    }

    /// The admin contract owning a transparent upgradeable proxy
    #[sol(rpc)]
    interface IProxyAdmin {
        function upgrade(address proxy, address implementation) external;
        function upgradeAndCall(address proxy, address implementation, bytes memory data) external payable;
    }

    /// The upgrade interface version exposed by OpenZeppelin 5 upgradeable contracts
    #[sol(rpc)]
    interface IUpgradeInterface {
        function UPGRADE_INTERFACE_VERSION() external view returns (string memory);
    }
}
