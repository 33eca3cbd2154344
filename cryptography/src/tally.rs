// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! The homomorphic ciphertext tally and its decrypted form.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ballot::CiphertextBallot;
use crate::election::Manifest;
use crate::elgamal::Ciphertext;
use crate::group::Element;
use crate::utils::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextTallySelection {
    pub object_id: String,
    /// The product of every cast ciphertext for this selection
    pub ciphertext: Ciphertext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextTallyContest {
    pub object_id: String,
    pub selections: BTreeMap<String, CiphertextTallySelection>,
}

/**
 * The running encrypted tally of every cast ballot.
 *
 * Every manifest contest and selection is present from creation, starting
 * at the trivial encryption of zero, so the tally of an election with no
 * ballots still decrypts to all zeroes.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextTally {
    pub object_id: String,
    pub cast: BTreeMap<String, CiphertextTallyContest>,
    pub cast_ballot_ids: BTreeSet<String>,
}

impl CiphertextTally {
    /// Creates an empty tally with one zero ciphertext per manifest selection.
    #[must_use]
    pub fn new(object_id: &str, manifest: &Manifest) -> Self {
        let cast = manifest
            .contests
            .iter()
            .map(|contest| {
                let selections = contest
                    .selections
                    .iter()
                    .map(|s| {
                        (
                            s.object_id.clone(),
                            CiphertextTallySelection {
                                object_id: s.object_id.clone(),
                                ciphertext: Ciphertext::zero(),
                            },
                        )
                    })
                    .collect();
                (
                    contest.object_id.clone(),
                    CiphertextTallyContest {
                        object_id: contest.object_id.clone(),
                        selections,
                    },
                )
            })
            .collect();

        CiphertextTally {
            object_id: object_id.to_string(),
            cast,
            cast_ballot_ids: BTreeSet::new(),
        }
    }

    /// Every `(contest id, selection id)` pair in the tally, in key order.
    #[must_use]
    pub fn selection_ids(&self) -> Vec<(String, String)> {
        self.cast
            .values()
            .flat_map(|contest| {
                contest
                    .selections
                    .keys()
                    .map(|s| (contest.object_id.clone(), s.clone()))
            })
            .collect()
    }

    #[must_use]
    pub fn selection(
        &self,
        contest_id: &str,
        selection_id: &str,
    ) -> Option<&CiphertextTallySelection> {
        self.cast
            .get(contest_id)
            .and_then(|c| c.selections.get(selection_id))
    }
}

/// Adds `ballot` to `tally`.
///
/// The ballot is checked against the tally before anything is accumulated,
/// so on error the tally is unchanged. Ballot validity is not checked here;
/// see [`crate::ballot::ballot_is_valid_for_election`].
///
/// # Errors
///
/// - `DuplicateBallot` if a ballot with the same object id was already tallied
/// - `UnknownContest`, `UnknownSelection` if the ballot does not fit the tally
/// - `RepeatedContest`, `RepeatedSelection` if the ballot names a contest or
///   selection twice
pub fn tally_ballot(ballot: &CiphertextBallot, tally: &mut CiphertextTally) -> Result<(), Error> {
    if tally.cast_ballot_ids.contains(&ballot.object_id) {
        return Err(Error::DuplicateBallot(ballot.object_id.clone()));
    }

    let mut updates = Vec::new();
    let mut seen_contests = BTreeSet::new();
    for contest in &ballot.contests {
        if !seen_contests.insert(contest.object_id.as_str()) {
            return Err(Error::RepeatedContest(contest.object_id.clone()));
        }
        let tally_contest = tally
            .cast
            .get(&contest.object_id)
            .ok_or_else(|| Error::UnknownContest(contest.object_id.clone()))?;
        let mut seen_selections = BTreeSet::new();
        for selection in &contest.selections {
            if !seen_selections.insert(selection.object_id.as_str()) {
                return Err(Error::RepeatedSelection {
                    contest: contest.object_id.clone(),
                    selection: selection.object_id.clone(),
                });
            }
            let current = tally_contest
                .selections
                .get(&selection.object_id)
                .ok_or_else(|| Error::UnknownSelection {
                    contest: contest.object_id.clone(),
                    selection: selection.object_id.clone(),
                })?;
            updates.push((
                contest.object_id.as_str(),
                selection.object_id.as_str(),
                current.ciphertext.add(&selection.ciphertext),
            ));
        }
    }

    for (contest_id, selection_id, ciphertext) in updates {
        if let Some(selection) = tally
            .cast
            .get_mut(contest_id)
            .and_then(|c| c.selections.get_mut(selection_id))
        {
            selection.ciphertext = ciphertext;
        }
    }
    tally.cast_ballot_ids.insert(ballot.object_id.clone());

    Ok(())
}

/// A decrypted selection tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextTallySelection {
    pub object_id: String,
    /// The number of votes cast for this selection
    pub tally: u64,
    /// `g^tally`, as recovered from the decryption shares
    pub value: Element,
}
