// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Error type for this library

use thiserror::Error;

/**
 * Error type for the cryptography library.
 *
 * This error type is used to represent all possible errors that can occur
 * within the cryptography library.
 */
#[derive(Error, Debug)]
pub enum Error {
    /// Occurs when bytes do not decode to a group element or a canonical scalar.
    #[error("{0}")]
    DeserializationError(String),

    /// Occurs when a hex string in a serialized value is malformed.
    #[error("Hex decoding error: {0}")]
    HexError(#[from] hex::FromHexError),

    /// Occurs when a manifest cannot be serialized for hashing.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Occurs when combining an empty set of public keys.
    #[error("No public keys to combine")]
    NoPublicKeys,

    /// Occurs when a manifest has no contests, an empty contest or repeated object ids.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Occurs when a plaintext ballot cannot be encrypted against the manifest.
    #[error("Invalid vote: {0}")]
    InvalidVote(String),

    /// Occurs when a range proof is requested for a value above its bound.
    #[error("Value {value} is outside the proof range 0..={bound}")]
    ValueOutOfRange { value: u64, bound: u64 },

    /// Occurs when a ballot with an already tallied object id is tallied again.
    #[error("Ballot {0} has already been tallied")]
    DuplicateBallot(String),

    /// Occurs when a ballot or share names a contest the tally does not have.
    #[error("Unknown contest {0}")]
    UnknownContest(String),

    /// Occurs when a ballot or share names a selection the tally does not have.
    #[error("Unknown selection {selection} in contest {contest}")]
    UnknownSelection { contest: String, selection: String },

    /// Occurs when a ballot carries the same contest more than once.
    #[error("Contest {0} appears more than once on the ballot")]
    RepeatedContest(String),

    /// Occurs when a ballot contest carries the same selection more than once.
    #[error("Selection {selection} appears more than once in contest {contest}")]
    RepeatedSelection { contest: String, selection: String },

    /// Occurs when combining zero partial decryptions.
    #[error("No decryption shares supplied")]
    NoDecryptionShares,

    /// Occurs when a partial decryption proof fails to verify.
    #[error("{0}")]
    DecryptProofFailed(String),

    /// Occurs when a decrypted tally exceeds the discrete log search bound.
    #[error("Decrypted tally exceeds the search bound {0}")]
    TallyOutOfRange(u64),
}
