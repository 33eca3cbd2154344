// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Board and cryptography configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration:
//!
//! ```toml
//! [board]
//! resubmission_policy = "reject"
//! tally_object_id = "county-2025-results"
//!
//! [cryptography]
//! max_tally = 250000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How a phase treats a second contribution from a guardian it has
/// already recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResubmissionPolicy {
    /// The later contribution replaces the earlier one and still counts
    /// once towards quorum.
    #[default]
    Overwrite,
    /// The later contribution fails with `DuplicateContribution`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub resubmission_policy: ResubmissionPolicy,
    /// Object id given to the cast tally when voting opens.
    pub tally_object_id: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            resubmission_policy: ResubmissionPolicy::default(),
            tally_object_id: "election-results".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptographyConfig {
    /// Largest per-selection tally the decryption search will find.
    pub max_tally: u64,
}

impl Default for CryptographyConfig {
    fn default() -> Self {
        CryptographyConfig { max_tally: 100_000 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub board: BoardConfig,
    pub cryptography: CryptographyConfig,
}

impl Config {
    /// # Errors
    ///
    /// - `Config` if `text` is not valid TOML for this structure
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// - `Io` if the file cannot be read
    /// - `Config` if its contents do not parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
