// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Election manifests and election parameters.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::elgamal::PublicKey;
use crate::group::{hash_to_scalar, Scalar};
use crate::utils::Error;

/// A selection (candidate, or yes/no option) within a contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionDescription {
    pub object_id: String,
}

/// A contest and the selections a voter may choose from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestDescription {
    pub object_id: String,
    /// The maximum number of selections a single ballot may mark.
    #[serde(default = "default_votes_allowed")]
    pub votes_allowed: u64,
    pub selections: Vec<SelectionDescription>,
}

fn default_votes_allowed() -> u64 {
    1
}

/**
 * The election manifest: every contest and selection a ballot must
 * carry, in order.
 *
 * The manifest is part of the `create_election` message and is hashed into
 * the extended base hash, so ballots and decryption proofs are bound to it.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub election_scope_id: String,
    pub contests: Vec<ContestDescription>,
}

impl Manifest {
    /// Checks that the manifest has at least one contest, that every
    /// contest has at least one selection and a non-zero vote limit, and
    /// that object ids are unique where they must be.
    ///
    /// # Errors
    ///
    /// - `InvalidManifest` describing the first problem found
    pub fn validate(&self) -> Result<(), Error> {
        if self.contests.is_empty() {
            return Err(Error::InvalidManifest("manifest has no contests".to_string()));
        }

        let mut contest_ids = BTreeSet::new();
        for contest in &self.contests {
            if !contest_ids.insert(contest.object_id.as_str()) {
                return Err(Error::InvalidManifest(format!(
                    "contest {} appears more than once",
                    contest.object_id
                )));
            }
            if contest.selections.is_empty() {
                return Err(Error::InvalidManifest(format!(
                    "contest {} has no selections",
                    contest.object_id
                )));
            }
            if contest.votes_allowed == 0 {
                return Err(Error::InvalidManifest(format!(
                    "contest {} allows no votes",
                    contest.object_id
                )));
            }

            let mut selection_ids = BTreeSet::new();
            for selection in &contest.selections {
                if !selection_ids.insert(selection.object_id.as_str()) {
                    return Err(Error::InvalidManifest(format!(
                        "selection {} appears more than once in contest {}",
                        selection.object_id, contest.object_id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Returns the contest with the given object id.
    #[must_use]
    pub fn contest(&self, object_id: &str) -> Option<&ContestDescription> {
        self.contests.iter().find(|c| c.object_id == object_id)
    }
}

/**
 * Everything needed to encrypt, validate and decrypt ballots for one
 * election: the manifest, the joint public key, the number of guardians
 * and the extended base hash binding them together.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionParameters {
    pub manifest: Manifest,
    pub joint_public_key: PublicKey,
    pub number_of_guardians: u64,
    pub extended_base_hash: Scalar,
}

impl ElectionParameters {
    /// Builds the parameters once the joint key is known.
    ///
    /// The extended base hash is deterministic in its inputs: anyone holding
    /// the manifest, the joint key and the guardian count recomputes it.
    ///
    /// # Errors
    ///
    /// - `InvalidManifest` if the manifest does not validate
    /// - `SerializationError` if the manifest cannot be encoded for hashing
    pub fn build(
        joint_public_key: &PublicKey,
        manifest: &Manifest,
        number_of_guardians: u64,
    ) -> Result<Self, Error> {
        manifest.validate()?;

        let manifest_bytes = serde_json::to_vec(manifest)?;
        let key_bytes = joint_public_key.y.to_bytes();
        let count_bytes = number_of_guardians.to_be_bytes();
        let input: [&[u8]; 3] = [&manifest_bytes, &key_bytes, &count_bytes];
        let tags: [&[u8]; 3] = [b"manifest", b"joint_public_key", b"number_of_guardians"];
        let extended_base_hash = hash_to_scalar(&input, &tags);

        Ok(ElectionParameters {
            manifest: manifest.clone(),
            joint_public_key: *joint_public_key,
            number_of_guardians,
            extended_base_hash,
        })
    }

    /// Proof context for a ballot component: the extended base hash
    /// followed by the object ids leading to it.
    #[must_use]
    pub fn proof_context(&self, object_ids: &[&str]) -> Vec<u8> {
        let mut context = self.extended_base_hash.to_bytes().to_vec();
        for id in object_ids {
            context.extend_from_slice(&(id.len() as u64).to_be_bytes());
            context.extend_from_slice(id.as_bytes());
        }
        context
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::elgamal::KeyPair;
    use rand::rngs::OsRng;

    pub(crate) fn two_contest_manifest() -> Manifest {
        Manifest {
            election_scope_id: "county-2025".to_string(),
            contests: vec![
                ContestDescription {
                    object_id: "mayor".to_string(),
                    votes_allowed: 1,
                    selections: vec![
                        SelectionDescription {
                            object_id: "alice".to_string(),
                        },
                        SelectionDescription {
                            object_id: "bob".to_string(),
                        },
                    ],
                },
                ContestDescription {
                    object_id: "council".to_string(),
                    votes_allowed: 2,
                    selections: vec![
                        SelectionDescription {
                            object_id: "carol".to_string(),
                        },
                        SelectionDescription {
                            object_id: "dave".to_string(),
                        },
                        SelectionDescription {
                            object_id: "erin".to_string(),
                        },
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_manifest_validation() {
        let manifest = two_contest_manifest();
        assert!(manifest.validate().is_ok());

        let mut repeated = manifest.clone();
        repeated.contests[1].object_id = "mayor".to_string();
        assert!(matches!(repeated.validate(), Err(Error::InvalidManifest(_))));

        let mut empty = manifest.clone();
        empty.contests[0].selections.clear();
        assert!(matches!(empty.validate(), Err(Error::InvalidManifest(_))));

        let none = Manifest {
            election_scope_id: "x".to_string(),
            contests: vec![],
        };
        assert!(none.validate().is_err());
    }

    #[test]
    fn test_votes_allowed_defaults_to_one() {
        let contest: ContestDescription =
            serde_json::from_str(r#"{"object_id": "c", "selections": [{"object_id": "s"}]}"#)
                .unwrap();
        assert_eq!(contest.votes_allowed, 1);
    }

    #[test]
    fn test_extended_hash_binds_inputs() {
        let manifest = two_contest_manifest();
        let key = KeyPair::generate(&mut OsRng).pkey;
        let other_key = KeyPair::generate(&mut OsRng).pkey;

        let p = ElectionParameters::build(&key, &manifest, 3).unwrap();
        assert_eq!(p, ElectionParameters::build(&key, &manifest, 3).unwrap());
        assert_ne!(
            p.extended_base_hash,
            ElectionParameters::build(&other_key, &manifest, 3)
                .unwrap()
                .extended_base_hash
        );
        assert_ne!(
            p.extended_base_hash,
            ElectionParameters::build(&key, &manifest, 2)
                .unwrap()
                .extended_base_hash
        );
    }
}
