//! Tests of the deploy & upgrade scripts against a mocked proxy management capability

mod common;

use alloy::primitives::{Address, Bytes};
use common::{Call, MockUpgrades};
use eyre::Result;
use scripts::{
    commands::{deploy_proxy, upgrade_proxy},
    constants::{
        DEFAULT_CENTRAL_AUTHORITY_ADDRESS, DEFAULT_INITIALIZER, DEFAULT_SIB_TEL_ADDRESS,
        DEFAULT_STABLECOIN_ADDRESS, PAYMENT_SETTLEMENT_CONTRACT, PAYMENT_SETTLEMENT_V2_CONTRACT,
        PLACEHOLDER_PROXY_ADDRESS,
    },
    errors::ScriptError,
    types::{DeploymentRequest, UpgradeRequest},
    utils::exit_status,
};

/// The `PaymentSettlement` deployment with the default addresses
fn payment_settlement_deployment() -> DeploymentRequest {
    DeploymentRequest::payment_settlement(
        DEFAULT_SIB_TEL_ADDRESS,
        DEFAULT_STABLECOIN_ADDRESS,
        DEFAULT_CENTRAL_AUTHORITY_ADDRESS,
    )
}

/// An upgrade of the proxy at `proxy` to `PaymentSettlementV2`
fn payment_settlement_upgrade(proxy: &str) -> UpgradeRequest {
    UpgradeRequest {
        proxy_address: proxy.to_string(),
        new_contract_name: PAYMENT_SETTLEMENT_V2_CONTRACT.to_string(),
        call_data: None,
    }
}

// ----------
// | Deploy |
// ----------

#[tokio::test]
async fn test_deploy_calls_capability_once() -> Result<()> {
    let upgrades = MockUpgrades::new();
    deploy_proxy(payment_settlement_deployment(), &upgrades).await?;

    assert_eq!(
        upgrades.calls(),
        vec![
            Call::Signer,
            Call::Artifact(PAYMENT_SETTLEMENT_CONTRACT.to_string()),
            Call::Deploy {
                contract: PAYMENT_SETTLEMENT_CONTRACT.to_string(),
                args: vec![
                    DEFAULT_SIB_TEL_ADDRESS.to_string(),
                    DEFAULT_STABLECOIN_ADDRESS.to_string(),
                    DEFAULT_CENTRAL_AUTHORITY_ADDRESS.to_string(),
                ],
                initializer: DEFAULT_INITIALIZER.to_string(),
            },
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_deploy_success() -> Result<()> {
    let upgrades = MockUpgrades::new();
    let res = deploy_proxy(payment_settlement_deployment(), &upgrades).await;

    assert_eq!(exit_status(&res), 0);
    let proxy = res?;
    assert_ne!(proxy.address, Address::ZERO);

    Ok(())
}

#[tokio::test]
async fn test_deploy_revert() {
    let upgrades = MockUpgrades::reverting("execution reverted: already initialized");
    let res = deploy_proxy(payment_settlement_deployment(), &upgrades).await;

    assert_eq!(exit_status(&res), 1);
    assert_eq!(
        res.unwrap_err().to_string(),
        "error deploying contract: execution reverted: already initialized"
    );
    assert_eq!(upgrades.transactions().len(), 1);
}

#[tokio::test]
async fn test_deploy_unfunded_signer() {
    let upgrades = MockUpgrades::unfunded();
    let res = deploy_proxy(payment_settlement_deployment(), &upgrades).await;

    assert!(matches!(res, Err(ScriptError::Signer(_))));
    assert_eq!(upgrades.calls(), vec![Call::Signer]);
}

#[tokio::test]
async fn test_deploy_missing_artifact() {
    let upgrades = MockUpgrades::missing_artifact(PAYMENT_SETTLEMENT_CONTRACT);
    let res = deploy_proxy(payment_settlement_deployment(), &upgrades).await;

    assert_eq!(exit_status(&res), 1);
    assert!(matches!(res, Err(ScriptError::ArtifactResolution(_))));
    assert!(upgrades.transactions().is_empty());
}

#[tokio::test]
async fn test_repeated_deploys_are_independent() -> Result<()> {
    let first = deploy_proxy(payment_settlement_deployment(), &MockUpgrades::new()).await?;
    let second = deploy_proxy(payment_settlement_deployment(), &MockUpgrades::new()).await?;

    assert_ne!(first.address, second.address);
    Ok(())
}

// -----------
// | Upgrade |
// -----------

#[tokio::test]
async fn test_upgrade_calls_capability_once() -> Result<()> {
    let proxy = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    let upgrades = MockUpgrades::new();
    let res = upgrade_proxy(payment_settlement_upgrade(proxy), &upgrades).await;

    assert_eq!(exit_status(&res), 0);
    assert_eq!(res?.address, proxy.parse::<Address>()?);
    assert_eq!(
        upgrades.calls(),
        vec![
            Call::Signer,
            Call::Artifact(PAYMENT_SETTLEMENT_V2_CONTRACT.to_string()),
            Call::Upgrade {
                proxy: proxy.to_string(),
                contract: PAYMENT_SETTLEMENT_V2_CONTRACT.to_string(),
                call: None,
            },
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_upgrade_forwards_calldata() -> Result<()> {
    let proxy = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    let call = Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]);
    let mut request = payment_settlement_upgrade(proxy);
    request.call_data = Some(call.clone());

    let upgrades = MockUpgrades::new();
    upgrade_proxy(request, &upgrades).await?;

    assert!(matches!(
        upgrades.transactions().as_slice(),
        [Call::Upgrade { call: Some(c), .. }] if *c == call
    ));
    Ok(())
}

#[tokio::test]
async fn test_upgrade_placeholder_address() {
    let upgrades = MockUpgrades::new();
    let request = payment_settlement_upgrade(PLACEHOLDER_PROXY_ADDRESS);
    let res = upgrade_proxy(request, &upgrades).await;

    assert_eq!(exit_status(&res), 1);
    assert!(matches!(res, Err(ScriptError::InvalidAddress(_))));
    // The address is passed through unvalidated, the capability rejects it
    assert_eq!(upgrades.transactions().len(), 1);
}

#[tokio::test]
async fn test_upgrade_revert() {
    let upgrades = MockUpgrades::reverting("new storage layout is incompatible");
    let res = upgrade_proxy(
        payment_settlement_upgrade("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
        &upgrades,
    )
    .await;

    assert_eq!(exit_status(&res), 1);
    assert!(matches!(res, Err(ScriptError::ContractInteraction(_))));
}
