// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Helpers for driving a board with real guardians, ballots and shares.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::OsRng;
use serde_json::{json, Value};

use cryptography::ballot::{encrypt_ballot, CiphertextBallot, PlaintextBallot};
use cryptography::decryption::compute_tally_shares;
use cryptography::election::{
    ContestDescription, ElectionParameters, Manifest, SelectionDescription,
};
use cryptography::elgamal::{combine_public_keys, KeyPair, PublicKey};
use cryptography::tally::CiphertextTally;

use crate::bulletin_board::top_level_actor::BulletinBoard;
use crate::config::{BoardConfig, ResubmissionPolicy};
use crate::cryptography::RistrettoElectionGuard;
use crate::messages::{Message, OutboundMessage};

pub(crate) struct Guardian {
    pub(crate) id: String,
    pub(crate) keypair: KeyPair,
}

impl Guardian {
    pub(crate) fn new(index: usize) -> Self {
        Guardian {
            id: format!("guardian-{index}"),
            keypair: KeyPair::generate(&mut OsRng),
        }
    }
}

pub(crate) fn guardians(n: usize) -> Vec<Guardian> {
    (0..n).map(Guardian::new).collect()
}

pub(crate) fn new_board(policy: ResubmissionPolicy) -> BulletinBoard<RistrettoElectionGuard> {
    let config = BoardConfig {
        resubmission_policy: policy,
        ..BoardConfig::default()
    };
    BulletinBoard::new(RistrettoElectionGuard::default(), config)
}

/// One yes/no question.
pub(crate) fn single_contest_manifest() -> Manifest {
    Manifest {
        election_scope_id: "referendum-2025".to_string(),
        contests: vec![contest("question-1", 1, &["yes", "no"])],
    }
}

fn contest(object_id: &str, votes_allowed: u64, selections: &[&str]) -> ContestDescription {
    ContestDescription {
        object_id: object_id.to_string(),
        votes_allowed,
        selections: selections
            .iter()
            .map(|s| SelectionDescription {
                object_id: s.to_string(),
            })
            .collect(),
    }
}

/// A single-seat race and a two-seat race.
pub(crate) fn two_contest_manifest() -> Manifest {
    Manifest {
        election_scope_id: "county-2025".to_string(),
        contests: vec![
            contest("mayor", 1, &["alice", "bob"]),
            contest("council", 2, &["carol", "dave", "erin"]),
        ],
    }
}

/// Parameters of a single-contest election with `n` fresh guardians, built
/// without a board.
pub(crate) fn single_contest_election(n: usize) -> (Vec<KeyPair>, ElectionParameters) {
    let keys: Vec<KeyPair> = (0..n).map(|_| KeyPair::generate(&mut OsRng)).collect();
    let joint = combine_public_keys(keys.iter().map(|k| &k.pkey)).unwrap();
    let parameters = ElectionParameters::build(&joint, &single_contest_manifest(), n as u64).unwrap();
    (keys, parameters)
}

// --- Messages ---

pub(crate) fn simple(message_type: &str) -> Message {
    Message {
        message_type: message_type.to_string(),
        content: Value::Null,
    }
}

fn message(message_type: &str, content: Value) -> Message {
    Message {
        message_type: message_type.to_string(),
        content,
    }
}

pub(crate) fn create_election(number_of_guardians: usize, manifest: Manifest) -> Message {
    message(
        "create_election",
        json!({"number_of_guardians": number_of_guardians, "manifest": manifest}),
    )
}

pub(crate) fn election_keys(guardian: &Guardian) -> Message {
    election_keys_with(&guardian.id, &guardian.keypair.pkey)
}

pub(crate) fn election_keys_with(guardian_id: &str, key: &PublicKey) -> Message {
    message(
        "key_ceremony.trustee_election_keys",
        json!({
            "guardian_id": guardian_id,
            "election_public_key": key,
            "proofs": [],
        }),
    )
}

pub(crate) fn partial_keys(guardian_id: &str) -> Message {
    message(
        "key_ceremony.trustee_partial_election_keys",
        json!({"guardian_id": guardian_id, "partial_keys": []}),
    )
}

pub(crate) fn verification(guardian_id: &str) -> Message {
    message(
        "key_ceremony.trustee_verification",
        json!({"guardian_id": guardian_id, "verifications": []}),
    )
}

/// Runs `create_election` through the key ceremony with every guardian in
/// order, returning the `end_key_ceremony` message.
pub(crate) fn run_key_ceremony(
    board: &mut BulletinBoard<RistrettoElectionGuard>,
    guardians: &[Guardian],
    manifest: Manifest,
) -> OutboundMessage {
    board
        .submit(&create_election(guardians.len(), manifest))
        .unwrap();
    board.submit(&simple("start_key_ceremony")).unwrap();
    for guardian in guardians {
        board.submit(&election_keys(guardian)).unwrap();
    }
    for guardian in guardians {
        board.submit(&partial_keys(&guardian.id)).unwrap();
    }
    let mut emitted = None;
    for guardian in guardians {
        emitted = board.submit(&verification(&guardian.id)).unwrap().or(emitted);
    }
    emitted.unwrap()
}

pub(crate) fn ballot_with(
    parameters: &ElectionParameters,
    ballot_id: &str,
    choices: &[(&str, &[&str])],
) -> CiphertextBallot {
    let plaintext = PlaintextBallot {
        object_id: ballot_id.to_string(),
        choices: choices
            .iter()
            .map(|(contest, selections)| {
                (
                    contest.to_string(),
                    selections.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
                )
            })
            .collect::<BTreeMap<_, _>>(),
    };
    encrypt_ballot(&plaintext, parameters, &mut OsRng).unwrap()
}

/// A ballot for the single-contest manifest.
pub(crate) fn ballot(parameters: &ElectionParameters, ballot_id: &str, choice: &str) -> CiphertextBallot {
    ballot_with(parameters, ballot_id, &[("question-1", &[choice][..])])
}

pub(crate) fn vote_cast(ballot: &CiphertextBallot) -> Message {
    message("vote.cast", serde_json::to_value(ballot).unwrap())
}

/// A guardian's `tally.trustee_share` for every selection of `tally`.
pub(crate) fn trustee_share(
    guardian: &Guardian,
    tally: &CiphertextTally,
    parameters: &ElectionParameters,
) -> Message {
    let shares =
        compute_tally_shares(&guardian.keypair, tally, &parameters.extended_base_hash, &mut OsRng);
    let contests: BTreeMap<&String, Value> = shares
        .iter()
        .map(|(contest_id, selections)| (contest_id, json!({"selections": selections})))
        .collect();
    message(
        "tally.trustee_share",
        json!({
            "guardian_id": guardian.id,
            "public_key": guardian.keypair.pkey,
            "contests": contests,
        }),
    )
}

/// The sealed tally, decoded from the board's `tally.cast` export.
pub(crate) fn tally_cast(board: &BulletinBoard<RistrettoElectionGuard>) -> CiphertextTally {
    let outbound = board.get_tally_cast().unwrap();
    serde_json::from_value(outbound.content.unwrap()).unwrap()
}
