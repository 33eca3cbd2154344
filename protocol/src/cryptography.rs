// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the boundary between the bulletin board and the
//! election cryptography. The board never inspects key material, ballots
//! or decryption shares itself; everything it needs from them goes through
//! [`ElectionCryptography`].

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use cryptography::ballot::{ballot_is_valid_for_election, CiphertextBallot};
use cryptography::decryption::{decrypt_selection_with_decryption_shares, PartialDecryption};
use cryptography::election::{ElectionParameters, Manifest};
use cryptography::elgamal::{combine_public_keys, PublicKey};
use cryptography::group::Scalar;
use cryptography::tally::{tally_ballot, CiphertextTally, PlaintextTallySelection};

use crate::config::CryptographyConfig;
use crate::messages::{ContestId, SelectionId};

/// The cryptographic operations the bulletin board delegates.
///
/// Every associated type the board decodes from a message is
/// `DeserializeOwned`; every one it emits is `Serialize`.
pub trait ElectionCryptography: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    type Manifest: Debug + Clone + DeserializeOwned + Send + Sync;
    type GuardianPublicKey: Debug + Clone + Serialize + DeserializeOwned + Send + Sync;
    type JointPublicKey: Debug + Clone + PartialEq + Serialize + Send + Sync;
    type ElectionParameters: Debug + Clone + Send + Sync;
    type ExtendedHash: Debug + Clone;
    type Ballot: Debug + DeserializeOwned + Send + Sync;
    type Tally: Debug + Clone + PartialEq + Serialize + Send;
    type PartialDecryption: Debug + Clone + Serialize + DeserializeOwned + Send + Sync;
    type PlaintextSelection: Debug + Clone + Serialize;

    /// Checks that `manifest` describes an election that can be run.
    fn validate_manifest(&self, manifest: &Self::Manifest) -> Result<(), Self::Error>;

    /// Combines every guardian's public key into the joint election key.
    fn combine_public_keys(
        &self,
        keys: &[&Self::GuardianPublicKey],
    ) -> Result<Self::JointPublicKey, Self::Error>;

    fn build_election_parameters(
        &self,
        joint_public_key: &Self::JointPublicKey,
        manifest: &Self::Manifest,
        number_of_guardians: usize,
    ) -> Result<Self::ElectionParameters, Self::Error>;

    /// Whether `ballot` is well formed for the election.
    fn validate_ballot(&self, ballot: &Self::Ballot, parameters: &Self::ElectionParameters)
        -> bool;

    fn ballot_id<'a>(&self, ballot: &'a Self::Ballot) -> &'a str;

    /// An empty tally covering every selection of the election.
    fn new_tally(&self, object_id: &str, parameters: &Self::ElectionParameters) -> Self::Tally;

    /// Adds `ballot` to `tally`, leaving `tally` unchanged on error.
    fn tally_ballot(&self, ballot: &Self::Ballot, tally: &mut Self::Tally)
        -> Result<(), Self::Error>;

    /// Every `(contest id, selection id)` the tally accumulates.
    fn cast_selections(&self, tally: &Self::Tally) -> Vec<(ContestId, SelectionId)>;

    /// The value decryption shares are bound to.
    fn extended_hash(&self, parameters: &Self::ElectionParameters) -> Self::ExtendedHash;

    /// Decrypts one tally selection from one partial decryption per guardian.
    fn combine_partial_decryptions(
        &self,
        tally: &Self::Tally,
        contest_id: &str,
        selection_id: &str,
        shares: &[(&Self::GuardianPublicKey, &Self::PartialDecryption)],
        extended_hash: &Self::ExtendedHash,
    ) -> Result<Self::PlaintextSelection, Self::Error>;
}

/**
 * [`ElectionCryptography`] over Ristretto255, backed by the
 * `tallyboard-cryptography` crate.
 *
 * The joint key is the product of the guardian keys, ballots are
 * exponential `ElGamal` ciphertexts with disjunctive Chaum-Pedersen range
 * proofs, and tallies are decrypted from Chaum-Pedersen-proven partial
 * decryptions of every guardian.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RistrettoElectionGuard {
    /// Largest per-selection tally recovered by decryption
    pub max_tally: u64,
}

impl Default for RistrettoElectionGuard {
    fn default() -> Self {
        Self::from(&CryptographyConfig::default())
    }
}

impl From<&CryptographyConfig> for RistrettoElectionGuard {
    fn from(config: &CryptographyConfig) -> Self {
        RistrettoElectionGuard {
            max_tally: config.max_tally,
        }
    }
}

impl ElectionCryptography for RistrettoElectionGuard {
    type Error = cryptography::Error;

    type Manifest = Manifest;
    type GuardianPublicKey = PublicKey;
    type JointPublicKey = PublicKey;
    type ElectionParameters = ElectionParameters;
    type ExtendedHash = Scalar;
    type Ballot = CiphertextBallot;
    type Tally = CiphertextTally;
    type PartialDecryption = PartialDecryption;
    type PlaintextSelection = PlaintextTallySelection;

    fn validate_manifest(&self, manifest: &Manifest) -> Result<(), Self::Error> {
        manifest.validate()
    }

    fn combine_public_keys(&self, keys: &[&PublicKey]) -> Result<PublicKey, Self::Error> {
        combine_public_keys(keys.iter().copied())
    }

    fn build_election_parameters(
        &self,
        joint_public_key: &PublicKey,
        manifest: &Manifest,
        number_of_guardians: usize,
    ) -> Result<ElectionParameters, Self::Error> {
        ElectionParameters::build(joint_public_key, manifest, number_of_guardians as u64)
    }

    fn validate_ballot(&self, ballot: &CiphertextBallot, parameters: &ElectionParameters) -> bool {
        ballot_is_valid_for_election(ballot, parameters)
    }

    fn ballot_id<'a>(&self, ballot: &'a CiphertextBallot) -> &'a str {
        &ballot.object_id
    }

    fn new_tally(&self, object_id: &str, parameters: &ElectionParameters) -> CiphertextTally {
        CiphertextTally::new(object_id, &parameters.manifest)
    }

    fn tally_ballot(
        &self,
        ballot: &CiphertextBallot,
        tally: &mut CiphertextTally,
    ) -> Result<(), Self::Error> {
        tally_ballot(ballot, tally)
    }

    fn cast_selections(&self, tally: &CiphertextTally) -> Vec<(ContestId, SelectionId)> {
        tally.selection_ids()
    }

    fn extended_hash(&self, parameters: &ElectionParameters) -> Scalar {
        parameters.extended_base_hash
    }

    fn combine_partial_decryptions(
        &self,
        tally: &CiphertextTally,
        contest_id: &str,
        selection_id: &str,
        shares: &[(&PublicKey, &PartialDecryption)],
        extended_hash: &Scalar,
    ) -> Result<PlaintextTallySelection, Self::Error> {
        let selection = tally.selection(contest_id, selection_id).ok_or_else(|| {
            cryptography::Error::UnknownSelection {
                contest: contest_id.to_string(),
                selection: selection_id.to_string(),
            }
        })?;
        decrypt_selection_with_decryption_shares(selection, shares, extended_hash, self.max_tally)
    }
}
