//! Resolution of compiled contract artifacts by name

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{json_abi::JsonAbi, primitives::Bytes};
use serde::Deserialize;

use crate::{
    constants::{ARTIFACT_EXTENSION, SOLIDITY_EXTENSION},
    errors::ScriptError,
    types::ContractArtifact,
};

/// The subset of a Hardhat or Foundry artifact used by the scripts
#[derive(Deserialize)]
struct RawArtifact {
    /// The contract ABI
    abi: JsonAbi,
    /// The contract creation bytecode
    bytecode: RawBytecode,
}

/// Creation bytecode, either a bare hex string (Hardhat) or an object
/// holding the hex string (Foundry)
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// A hex string
    Hex(String),
    /// An object with the hex string under `object`
    Object {
        /// The hex string
        object: String,
    },
}

impl RawBytecode {
    /// The bytecode hex string
    fn hex(&self) -> &str {
        match self {
            RawBytecode::Hex(hex) => hex,
            RawBytecode::Object { object } => object,
        }
    }
}

/// Locate and parse the artifact for the contract `name` under `artifacts_dir`
pub fn load_artifact(artifacts_dir: &Path, name: &str) -> Result<ContractArtifact, ScriptError> {
    let path = find_artifact(artifacts_dir, name)?;
    let contents =
        fs::read_to_string(&path).map_err(|e| ScriptError::ArtifactResolution(e.to_string()))?;

    parse_artifact(name, &contents)
}

/// Find the artifact file for the contract `name`.
///
/// Both compilers lay artifacts out as `<Source>.sol/<Name>.json`, Hardhat nesting
/// them further under the source tree. An artifact under `<Name>.sol` wins over
/// a same-named contract declared in another source file.
pub fn find_artifact(artifacts_dir: &Path, name: &str) -> Result<PathBuf, ScriptError> {
    let file_name = format!("{name}.{ARTIFACT_EXTENSION}");
    let preferred_parent = format!("{name}.{SOLIDITY_EXTENSION}");

    let mut candidates = Vec::new();
    let mut to_visit = vec![artifacts_dir.to_path_buf()];
    while let Some(dir) = to_visit.pop() {
        let entries = fs::read_dir(&dir)
            .map_err(|e| ScriptError::ArtifactResolution(format!("{}: {}", dir.display(), e)))?;

        for entry in entries {
            let entry = entry.map_err(|e| ScriptError::ArtifactResolution(e.to_string()))?;
            let file_type = entry
                .file_type()
                .map_err(|e| ScriptError::ArtifactResolution(e.to_string()))?;
            let path = entry.path();

            // Symlinked directories are not followed, they may form cycles
            if file_type.is_dir() {
                to_visit.push(path);
            } else if path.file_name().is_some_and(|f| f == file_name.as_str())
                && path
                    .parent()
                    .and_then(Path::extension)
                    .is_some_and(|ext| ext == SOLIDITY_EXTENSION)
            {
                candidates.push(path);
            }
        }
    }

    // Sort for a deterministic pick when a name is declared in several sources
    candidates.sort();
    let preferred = candidates.iter().position(|path| {
        path.parent()
            .and_then(Path::file_name)
            .is_some_and(|parent| parent == preferred_parent.as_str())
    });

    match preferred {
        Some(idx) => Ok(candidates.swap_remove(idx)),
        None => candidates.into_iter().next().ok_or_else(|| {
            ScriptError::ArtifactResolution(format!(
                "no artifact for contract `{name}` under {}",
                artifacts_dir.display()
            ))
        }),
    }
}

/// Parse the JSON artifact of the contract `name`
pub fn parse_artifact(name: &str, contents: &str) -> Result<ContractArtifact, ScriptError> {
    let raw: RawArtifact =
        serde_json::from_str(contents).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let bytecode = Bytes::from_str(raw.bytecode.hex())
        .map_err(|e| ScriptError::ArtifactParsing(format!("{name} bytecode: {e}")))?;

    // Interfaces & abstract contracts compile to empty bytecode
    if bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "{name} has no creation bytecode"
        )));
    }

    Ok(ContractArtifact {
        name: name.to_string(),
        abi: raw.abi,
        bytecode,
    })
}
