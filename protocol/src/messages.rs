// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the message envelope exchanged with the bulletin
//! board and the content structures of each message type. Content is left
//! as raw JSON in the envelope and decoded only by the step that accepts
//! the message, so a message for another phase is never interpreted.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use crate::error::Error;

/// Guardians are identified by the id they submit with their election keys.
pub type GuardianId = String;
pub type ContestId = String;
pub type SelectionId = String;

/// The message types known to the board. Inbound types are routed to the
/// step that accepts them; the others label outbound messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, AsRefStr,
)]
pub enum MessageType {
    #[strum(serialize = "create_election")]
    CreateElection,
    #[strum(serialize = "start_key_ceremony")]
    StartKeyCeremony,
    #[strum(serialize = "key_ceremony.trustee_election_keys")]
    TrusteeElectionKeys,
    #[strum(serialize = "key_ceremony.trustee_partial_election_keys")]
    TrusteePartialElectionKeys,
    #[strum(serialize = "key_ceremony.trustee_verification")]
    TrusteeVerification,
    #[strum(serialize = "start_vote")]
    StartVote,
    #[strum(serialize = "vote.cast")]
    VoteCast,
    #[strum(serialize = "end_vote")]
    EndVote,
    #[strum(serialize = "start_tally")]
    StartTally,
    #[strum(serialize = "tally.trustee_share")]
    TrusteeShare,

    /// Emitted once the joint key is built.
    #[strum(serialize = "end_key_ceremony")]
    EndKeyCeremony,
    /// Emitted once the tally is decrypted.
    #[strum(serialize = "end_tally")]
    EndTally,
    /// Export of the cast tally.
    #[strum(serialize = "tally.cast")]
    TallyCast,
    /// Ballot ingestion through the side channel; never accepted by a step.
    #[strum(serialize = "ballot.add")]
    BallotAdd,
}

/// An inbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_type: String,
    #[serde(default)]
    pub content: Value,
}

impl Message {
    #[must_use]
    pub fn new(message_type: MessageType, content: Value) -> Self {
        Message {
            message_type: message_type.to_string(),
            content,
        }
    }

    /// Decodes the content as `T`.
    ///
    /// # Errors
    ///
    /// - `MalformedPayload` naming this message's type
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        T::deserialize(&self.content).map_err(|source| Error::MalformedPayload {
            message_type: self.message_type.clone(),
            source,
        })
    }
}

/// A message emitted by the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
}

impl OutboundMessage {
    #[must_use]
    pub fn with_content(message_type: MessageType, content: Value) -> Self {
        OutboundMessage {
            message_type: message_type.to_string(),
            content: Some(content),
            results: None,
        }
    }

    #[must_use]
    pub fn with_results(message_type: MessageType, results: Value) -> Self {
        OutboundMessage {
            message_type: message_type.to_string(),
            content: None,
            results: Some(results),
        }
    }
}

// --- Message content ---

/// Content of `create_election`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateElectionMsg<M> {
    pub number_of_guardians: usize,
    pub manifest: M,
}

/// Content of `key_ceremony.trustee_election_keys`. Fields other than the
/// guardian id and public key are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrusteeElectionKeysMsg<K> {
    #[serde(alias = "owner_id")]
    pub guardian_id: GuardianId,
    pub election_public_key: K,
}

/// Content of `key_ceremony.trustee_partial_election_keys`. Only the sender
/// is recorded; the key shares themselves pass between guardians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrusteePartialKeysMsg {
    #[serde(alias = "owner_id")]
    pub guardian_id: GuardianId,
}

/// Content of `key_ceremony.trustee_verification`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrusteeVerificationMsg {
    #[serde(alias = "owner_id")]
    pub guardian_id: GuardianId,
}

/// Content of `end_key_ceremony`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndKeyCeremonyMsg<K> {
    pub joint_key: K,
}

/// Content of `tally.trustee_share`: one partial decryption per tally
/// selection, keyed by contest id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrusteeShareMsg<K, P> {
    #[serde(alias = "owner_id")]
    pub guardian_id: GuardianId,
    pub public_key: K,
    pub contests: BTreeMap<ContestId, ContestShares<P>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestShares<P> {
    pub selections: BTreeMap<SelectionId, P>,
}

impl<K, P> TrusteeShareMsg<K, P> {
    /// The partial decryption for one selection, if this bundle has it.
    #[must_use]
    pub fn share(&self, contest_id: &str, selection_id: &str) -> Option<&P> {
        self.contests
            .get(contest_id)
            .and_then(|c| c.selections.get(selection_id))
    }
}

/// One contest of the `end_tally` results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestResult<S> {
    pub object_id: ContestId,
    pub selections: BTreeMap<SelectionId, S>,
}
