//! Scripts for deploying the payment settlement contract behind an upgradeable proxy,
//! and for upgrading it to new versions.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod errors;
pub mod evm;
mod solidity;
pub mod types;
pub mod upgrades;
pub mod utils;
