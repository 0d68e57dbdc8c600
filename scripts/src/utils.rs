//! Utilities for the deploy & upgrade scripts.

use std::{fs, path::Path, str::FromStr};

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier},
    json_abi::{JsonAbi, Param},
    network::Ethereum,
    primitives::{Address, Bytes, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    constants::{
        DEFAULT_INITIALIZER, DEPLOYMENTS_KEY, EXIT_FAILURE, EXIT_SUCCESS,
        IMPLEMENTATION_KEY_SUFFIX, NUM_BYTES_ADDRESS, NUM_BYTES_STORAGE_SLOT, PROXY_KEY_SUFFIX,
    },
    errors::ScriptError,
    types::ContractArtifact,
};

/// The provider type used to talk to the chain
pub type Client = DynProvider<Ethereum>;

/// Sets up a client signing with the given private key against the given RPC url,
/// returning it alongside the signer's address
pub async fn setup_client(priv_key: &str, rpc_url: &str) -> Result<(Client, Address), ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let signer_address = signer.address();

    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    debug!("Connected to {rpc_url} (chain id {chain_id})");

    Ok((DynProvider::new(provider), signer_address))
}

/// Parse a hex chain address
pub fn parse_address(address: &str) -> Result<Address, ScriptError> {
    Address::from_str(address).map_err(|e| ScriptError::InvalidAddress(format!("{address}: {e}")))
}

/// Parse optional hex calldata, absent calldata being empty
pub fn parse_calldata(calldata: Option<&str>) -> Result<Option<Bytes>, ScriptError> {
    calldata
        .map(|hex| {
            Bytes::from_str(hex).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
        })
        .transpose()
}

/// Extract the address right-aligned in a storage slot
pub fn address_from_slot(word: U256) -> Address {
    Address::from_slice(
        &word.to_be_bytes::<NUM_BYTES_STORAGE_SLOT>()
            [NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..NUM_BYTES_STORAGE_SLOT],
    )
}

/// Prepare calldata for the initializer of a contract deployed behind a proxy.
///
/// Each argument is coerced to the type of the matching initializer parameter.
/// A contract without the default initializer, deployed with no arguments,
/// is left uninitialized.
pub fn initializer_calldata(
    abi: &JsonAbi,
    initializer: &str,
    args: &[String],
) -> Result<Bytes, ScriptError> {
    let overloads = abi.function(initializer);
    if overloads.is_none() && args.is_empty() && initializer == DEFAULT_INITIALIZER {
        return Ok(Bytes::new());
    }

    let function = overloads
        .and_then(|fns| fns.iter().find(|f| f.inputs.len() == args.len()))
        .ok_or_else(|| {
            ScriptError::CalldataConstruction(format!(
                "no function `{initializer}` taking {} arguments",
                args.len()
            ))
        })?;

    let values = function
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| coerce_arg(param, arg))
        .collect::<Result<Vec<_>, _>>()?;

    function
        .abi_encode_input(&values)
        .map(Bytes::from)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

/// Coerce a textual argument to the type of the parameter it is passed as
fn coerce_arg(param: &Param, arg: &str) -> Result<DynSolValue, ScriptError> {
    let err = |e: String| {
        ScriptError::CalldataConstruction(format!("argument `{}` ({arg}): {e}", param.name))
    };

    match param.resolve().map_err(|e| err(e.to_string()))? {
        // Addresses are accepted regardless of checksum casing
        DynSolType::Address => Address::from_str(arg)
            .map(DynSolValue::Address)
            .map_err(|e| err(e.to_string())),
        ty => ty.coerce_str(arg).map_err(|e| err(e.to_string())),
    }
}

/// Prepare the creation code of an EIP-1967 proxy pointed at `implementation`,
/// which calls the implementation with `data` upon construction
pub fn proxy_creation_code(
    proxy: &ContractArtifact,
    implementation: Address,
    data: Bytes,
) -> Result<Bytes, ScriptError> {
    let constructor = proxy.abi.constructor.as_ref().ok_or_else(|| {
        ScriptError::ArtifactParsing(format!("{} has no constructor", proxy.name))
    })?;

    let constructor_args = constructor
        .abi_encode_input(&[
            DynSolValue::Address(implementation),
            DynSolValue::Bytes(data.to_vec()),
        ])
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

    let code = [&proxy.bytecode[..], constructor_args.as_slice()].concat();
    Ok(code.into())
}

// ---------------
// | Deployments |
// ---------------

/// The deployments file key of a contract's proxy
pub fn proxy_key(contract: &str) -> String {
    format!("{contract}{PROXY_KEY_SUFFIX}")
}

/// The deployments file key of a contract's implementation
pub fn implementation_key(contract: &str) -> String {
    format!("{contract}{IMPLEMENTATION_KEY_SUFFIX}")
}

/// Read the JSON contents of the deployments file
fn get_json_from_file(file_path: &Path) -> Result<Value, ScriptError> {
    let contents = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::ReadDeployments(format!("{}: {}", file_path.display(), e)))?;

    serde_json::from_str(&contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Read the address recorded under `contract_key` in the deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &Path,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    let address = parsed_json[DEPLOYMENTS_KEY][contract_key]
        .as_str()
        .ok_or_else(|| {
            ScriptError::ReadDeployments(format!("no address recorded for `{contract_key}`"))
        })?;

    Address::from_str(address).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Find the contract whose proxy is recorded at `proxy` in the deployments file,
/// if the file exists
pub fn find_deployment_key(
    file_path: &Path,
    proxy: Address,
) -> Result<Option<String>, ScriptError> {
    if !file_path.exists() {
        return Ok(None);
    }

    let parsed_json = get_json_from_file(file_path)?;
    let Some(deployments) = parsed_json[DEPLOYMENTS_KEY].as_object() else {
        return Ok(None);
    };

    let contract = deployments.iter().find_map(|(key, address)| {
        let contract = key.strip_suffix(PROXY_KEY_SUFFIX)?;
        let address = Address::from_str(address.as_str()?).ok()?;
        (address == proxy).then(|| contract.to_string())
    });

    Ok(contract)
}

/// Record `address` under `contract_key` in the deployments file,
/// creating the file if it does not exist
pub fn write_deployed_address(
    file_path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    let mut parsed_json = if file_path.exists() {
        get_json_from_file(file_path)?
    } else {
        json!({})
    };

    let deployments = parsed_json
        .as_object_mut()
        .ok_or_else(|| ScriptError::WriteDeployments("file is not a JSON object".to_string()))?
        .entry(DEPLOYMENTS_KEY)
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| {
            ScriptError::WriteDeployments(format!("`{DEPLOYMENTS_KEY}` is not a JSON object"))
        })?;
    deployments.insert(
        contract_key.to_string(),
        Value::String(format!("{address:#x}")),
    );

    let contents = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(file_path, contents).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
}

/// The process exit status for the result of a script
pub fn exit_status<T>(result: &Result<T, ScriptError>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}
