// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Plaintext and encrypted ballots.
//!
//! A ciphertext ballot carries one encrypted selection per manifest
//! selection, each proven to encrypt `0` or `1`, and one proof per contest
//! that the homomorphic sum of its selections is at most the number of
//! votes allowed. Proof contexts bind every proof to the extended base hash
//! and to the ballot, contest and selection it belongs to, so proofs cannot
//! be lifted from one position to another.

use std::collections::{BTreeMap, BTreeSet};

use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::election::{ContestDescription, ElectionParameters};
use crate::elgamal::Ciphertext;
use crate::group::Scalar;
use crate::utils::Error;
use crate::zkp::range::RangeProof;

/// A voter's choices: for each contest id, the set of chosen selection ids.
/// Contests absent from `choices` are encrypted as undervotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextBallot {
    pub object_id: String,
    pub choices: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextBallotSelection {
    pub object_id: String,
    pub ciphertext: Ciphertext,
    /// Proof that the selection encrypts `0` or `1`
    pub proof: RangeProof,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextBallotContest {
    pub object_id: String,
    pub selections: Vec<CiphertextBallotSelection>,
    /// Proof that the sum of the selections is at most `votes_allowed`
    pub proof: RangeProof,
}

impl CiphertextBallotContest {
    /// The homomorphic sum of every selection in this contest.
    #[must_use]
    pub fn aggregate(&self) -> Ciphertext {
        self.selections
            .iter()
            .fold(Ciphertext::zero(), |acc, s| acc.add(&s.ciphertext))
    }
}

/**
 * An encrypted ballot, as cast to the bulletin board.
 *
 * # Examples
 *
 * ```
 * use std::collections::{BTreeMap, BTreeSet};
 * use cryptography::ballot::{ballot_is_valid_for_election, encrypt_ballot, PlaintextBallot};
 * use cryptography::election::{ContestDescription, ElectionParameters, Manifest, SelectionDescription};
 * use cryptography::elgamal::KeyPair;
 *
 * let mut rng = rand::rngs::OsRng;
 * let manifest = Manifest {
 *     election_scope_id: "referendum".to_string(),
 *     contests: vec![ContestDescription {
 *         object_id: "question-1".to_string(),
 *         votes_allowed: 1,
 *         selections: vec![
 *             SelectionDescription { object_id: "yes".to_string() },
 *             SelectionDescription { object_id: "no".to_string() },
 *         ],
 *     }],
 * };
 * let keypair = KeyPair::generate(&mut rng);
 * let parameters = ElectionParameters::build(&keypair.pkey, &manifest, 1).unwrap();
 *
 * let plaintext = PlaintextBallot {
 *     object_id: "ballot-1".to_string(),
 *     choices: BTreeMap::from([(
 *         "question-1".to_string(),
 *         BTreeSet::from(["yes".to_string()]),
 *     )]),
 * };
 * let ballot = encrypt_ballot(&plaintext, &parameters, &mut rng).unwrap();
 * assert!(ballot_is_valid_for_election(&ballot, &parameters));
 * ```
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextBallot {
    pub object_id: String,
    pub contests: Vec<CiphertextBallotContest>,
}

/// Encrypts a plaintext ballot under the joint key in `parameters`.
///
/// # Errors
///
/// - `InvalidVote` if the ballot names a contest or selection that is not
///   in the manifest, or chooses more selections than a contest allows
pub fn encrypt_ballot<R: RngCore + CryptoRng>(
    plaintext: &PlaintextBallot,
    parameters: &ElectionParameters,
    rng: &mut R,
) -> Result<CiphertextBallot, Error> {
    let manifest = &parameters.manifest;
    if let Some(unknown) = plaintext
        .choices
        .keys()
        .find(|id| manifest.contest(id).is_none())
    {
        return Err(Error::InvalidVote(format!("unknown contest {unknown}")));
    }

    let none = BTreeSet::new();
    let contests = manifest
        .contests
        .iter()
        .map(|contest| {
            let chosen = plaintext.choices.get(&contest.object_id).unwrap_or(&none);
            encrypt_contest(&plaintext.object_id, contest, chosen, parameters, rng)
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(CiphertextBallot {
        object_id: plaintext.object_id.clone(),
        contests,
    })
}

fn encrypt_contest<R: RngCore + CryptoRng>(
    ballot_id: &str,
    contest: &ContestDescription,
    chosen: &BTreeSet<String>,
    parameters: &ElectionParameters,
    rng: &mut R,
) -> Result<CiphertextBallotContest, Error> {
    if let Some(unknown) = chosen
        .iter()
        .find(|id| !contest.selections.iter().any(|s| &s.object_id == *id))
    {
        return Err(Error::InvalidVote(format!(
            "unknown selection {unknown} in contest {}",
            contest.object_id
        )));
    }
    let votes = chosen.len() as u64;
    if votes > contest.votes_allowed {
        return Err(Error::InvalidVote(format!(
            "{votes} selections made in contest {}, which allows {}",
            contest.object_id, contest.votes_allowed
        )));
    }

    let key = &parameters.joint_public_key;
    let mut nonce_sum = Scalar::zero();
    let mut selections = Vec::with_capacity(contest.selections.len());
    for selection in &contest.selections {
        let value = u64::from(chosen.contains(&selection.object_id));
        let r = Scalar::random(rng);
        let ciphertext = Ciphertext::encrypt_exp(value, &r, key);
        let context =
            parameters.proof_context(&[ballot_id, &contest.object_id, &selection.object_id]);
        let proof = RangeProof::prove(&ciphertext, value, 1, &r, key, &context, rng)?;

        nonce_sum = nonce_sum.add(&r);
        selections.push(CiphertextBallotSelection {
            object_id: selection.object_id.clone(),
            ciphertext,
            proof,
        });
    }

    let aggregate = selections
        .iter()
        .fold(Ciphertext::zero(), |acc, s| acc.add(&s.ciphertext));
    let context = parameters.proof_context(&[ballot_id, &contest.object_id]);
    let proof = RangeProof::prove(
        &aggregate,
        votes,
        contest.votes_allowed,
        &nonce_sum,
        key,
        &context,
        rng,
    )?;

    Ok(CiphertextBallotContest {
        object_id: contest.object_id.clone(),
        selections,
        proof,
    })
}

/// Checks that `ballot` is well formed for the election described by
/// `parameters`.
///
/// A ballot is valid iff it carries every manifest contest exactly once,
/// every contest carries every manifest selection exactly once, and every
/// selection and contest proof verifies. Contests are checked in parallel.
#[must_use]
pub fn ballot_is_valid_for_election(
    ballot: &CiphertextBallot,
    parameters: &ElectionParameters,
) -> bool {
    let manifest = &parameters.manifest;
    if ballot.contests.len() != manifest.contests.len() {
        return false;
    }
    let ids: BTreeSet<&str> = ballot
        .contests
        .iter()
        .map(|c| c.object_id.as_str())
        .collect();
    if ids.len() != ballot.contests.len() {
        return false;
    }

    ballot.contests.par_iter().all(|contest| {
        manifest
            .contest(&contest.object_id)
            .is_some_and(|description| {
                contest_is_valid(&ballot.object_id, contest, description, parameters)
            })
    })
}

fn contest_is_valid(
    ballot_id: &str,
    contest: &CiphertextBallotContest,
    description: &ContestDescription,
    parameters: &ElectionParameters,
) -> bool {
    if contest.selections.len() != description.selections.len() {
        return false;
    }
    let key = &parameters.joint_public_key;

    let mut seen = BTreeSet::new();
    for selection in &contest.selections {
        if !seen.insert(selection.object_id.as_str()) {
            return false;
        }
        if !description
            .selections
            .iter()
            .any(|s| s.object_id == selection.object_id)
        {
            return false;
        }
        let context =
            parameters.proof_context(&[ballot_id, &contest.object_id, &selection.object_id]);
        if !selection
            .proof
            .verify(&selection.ciphertext, 1, key, &context)
        {
            return false;
        }
    }

    let context = parameters.proof_context(&[ballot_id, &contest.object_id]);
    contest
        .proof
        .verify(&contest.aggregate(), description.votes_allowed, key, &context)
}
