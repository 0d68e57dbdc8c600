//! Definitions of errors that can occur during the execution of the proxy deploy & upgrade scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the proxy deploy & upgrade scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error fetching or validating the signing account
    Signer(String),
    /// Error locating a compiled contract artifact
    ArtifactResolution(String),
    /// Error parsing a compiled contract artifact
    ArtifactParsing(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// A malformed chain address
    InvalidAddress(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// The given address does not hold an EIP-1967 proxy
    NotAProxy(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::Signer(s) => write!(f, "error with signing account: {}", s),
            ScriptError::ArtifactResolution(s) => write!(f, "error resolving artifact: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::InvalidAddress(s) => write!(f, "invalid address: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::NotAProxy(s) => write!(f, "not an upgradeable proxy: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
        }
    }
}

impl Error for ScriptError {}
