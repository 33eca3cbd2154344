// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Error type for the bulletin board.

use thiserror::Error;

/**
 * Error type for the bulletin board.
 *
 * A message of a type the active step does not accept is not an error;
 * the board ignores it and `submit` returns `Ok(None)`. Every error below
 * leaves the board state exactly as it was before the offending call.
 */
#[derive(Error, Debug)]
pub enum Error {
    /// Occurs when inbound text is not a `{message_type, content}` envelope.
    #[error("Malformed message envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    /// Occurs when the content of an accepted message does not decode.
    #[error("Malformed {message_type} payload: {source}")]
    MalformedPayload {
        message_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// Occurs when a cast ballot fails validation against the election.
    #[error("Ballot {ballot_id} is not valid for this election")]
    InvalidBallot { ballot_id: String },

    /// Occurs when `create_election` describes an impossible election.
    #[error("Invalid election: {0}")]
    InvalidElection(String),

    /// Occurs under the reject policy when a guardian contributes twice to a phase.
    #[error("Guardian {guardian_id} already submitted {message_type}")]
    DuplicateContribution {
        message_type: String,
        guardian_id: String,
    },

    /// Occurs when ballots are ingested or the tally is read before voting opens.
    #[error("Voting is not open")]
    VotingNotOpen,

    /// Occurs when ballots are ingested after `start_tally` sealed the box.
    #[error("The ballot box is closed")]
    BallotBoxClosed,

    /// Occurs when a decryption share bundle comes from a guardian that took
    /// no part in the key ceremony.
    #[error("Guardian {guardian_id} has no election key")]
    UnknownGuardian { guardian_id: String },

    /// Occurs when a guardian's share bundle lacks a tally selection.
    #[error(
        "Guardian {guardian_id} has no share for selection {selection_id} of contest {contest_id}"
    )]
    MissingShare {
        guardian_id: String,
        contest_id: String,
        selection_id: String,
    },

    /// Occurs when election state a step relies on was never recorded.
    #[error("Missing election state: {0}")]
    MissingState(&'static str),

    /// Occurs when the election cryptography reports a failure.
    #[error("Cryptography error: {0}")]
    Cryptography(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Occurs when an outbound payload cannot be encoded.
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn cryptography<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Cryptography(Box::new(error))
    }
}
