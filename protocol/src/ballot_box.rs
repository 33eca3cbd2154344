// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the ballot box: the cast tally and the ingestion path
//! that accumulates ballots into it. The ballot box is shared between the
//! bulletin board, which opens and closes it as phases change, and any
//! number of ingestion threads holding clones of it.

use std::sync::Arc;

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::cryptography::ElectionCryptography;
use crate::error::Error;

pub(crate) enum BallotBoxState<C: ElectionCryptography> {
    NotOpened,
    Open {
        parameters: C::ElectionParameters,
        tally: C::Tally,
    },
    Closed {
        tally: C::Tally,
    },
}

/// The outcome of a batch ingestion.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Ids of the ballots added to the tally, in input order
    pub accepted: Vec<String>,
    /// Ids of the ballots that were not, with the reason
    pub rejected: Vec<(String, Error)>,
}

/**
 * A handle to the ballot box of one election.
 *
 * Clones share the same tally behind a single lock; ingestion from many
 * threads serializes only on the tally update itself.
 */
pub struct BallotBox<C: ElectionCryptography> {
    crypto: Arc<C>,
    state: Arc<Mutex<BallotBoxState<C>>>,
}

impl<C: ElectionCryptography> Clone for BallotBox<C> {
    fn clone(&self) -> Self {
        BallotBox {
            crypto: Arc::clone(&self.crypto),
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: ElectionCryptography> std::fmt::Debug for BallotBox<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.state.lock() {
            BallotBoxState::NotOpened => "not opened",
            BallotBoxState::Open { .. } => "open",
            BallotBoxState::Closed { .. } => "closed",
        };
        f.debug_struct("BallotBox").field("state", &state).finish()
    }
}

impl<C: ElectionCryptography> BallotBox<C> {
    pub(crate) fn new(crypto: Arc<C>) -> Self {
        BallotBox {
            crypto,
            state: Arc::new(Mutex::new(BallotBoxState::NotOpened)),
        }
    }

    /// Opens the box with an empty tally. Only a box that was never opened
    /// can be opened.
    pub(crate) fn open(
        &self,
        parameters: C::ElectionParameters,
        tally: C::Tally,
    ) -> Result<(), Error> {
        let mut state = self.state.lock();
        if !matches!(*state, BallotBoxState::NotOpened) {
            return Err(Error::MissingState("an unopened ballot box"));
        }
        *state = BallotBoxState::Open { parameters, tally };
        Ok(())
    }

    /// Seals the tally and returns a copy of it.
    pub(crate) fn close(&self) -> Result<C::Tally, Error> {
        let mut state = self.state.lock();
        match std::mem::replace(&mut *state, BallotBoxState::NotOpened) {
            BallotBoxState::Open { tally, .. } => {
                *state = BallotBoxState::Closed {
                    tally: tally.clone(),
                };
                Ok(tally)
            }
            BallotBoxState::NotOpened => Err(Error::VotingNotOpen),
            closed @ BallotBoxState::Closed { .. } => {
                *state = closed;
                Err(Error::BallotBoxClosed)
            }
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(*self.state.lock(), BallotBoxState::Open { .. })
    }

    /// Adds a ballot to the tally. The ballot is not validated here; it is
    /// expected to have been accepted by `vote.cast` (or see
    /// [`BallotBox::validate_and_ingest_all`]).
    ///
    /// # Errors
    ///
    /// - `VotingNotOpen` before `start_vote`
    /// - `BallotBoxClosed` after `start_tally`
    /// - `Cryptography` if the ballot does not fit the tally or was already
    ///   counted, in which case the tally is unchanged
    pub fn add_ballot(&self, ballot: &C::Ballot) -> Result<(), Error> {
        let mut state = self.state.lock();
        match &mut *state {
            BallotBoxState::NotOpened => Err(Error::VotingNotOpen),
            BallotBoxState::Closed { .. } => Err(Error::BallotBoxClosed),
            BallotBoxState::Open { tally, .. } => {
                self.crypto
                    .tally_ballot(ballot, tally)
                    .map_err(Error::cryptography)?;
                debug!(ballot_id = self.crypto.ballot_id(ballot), "ballot tallied");
                Ok(())
            }
        }
    }

    /// Validates `ballots` in parallel and tallies the valid ones.
    ///
    /// Validation runs without holding the lock; the accepted ballots are
    /// then tallied in input order under one acquisition.
    ///
    /// # Errors
    ///
    /// - `VotingNotOpen` before `start_vote`
    /// - `BallotBoxClosed` if the box was sealed before or during the batch,
    ///   in which case nothing from the batch is tallied
    pub fn validate_and_ingest_all(&self, ballots: &[C::Ballot]) -> Result<IngestReport, Error> {
        let parameters = match &*self.state.lock() {
            BallotBoxState::NotOpened => return Err(Error::VotingNotOpen),
            BallotBoxState::Closed { .. } => return Err(Error::BallotBoxClosed),
            BallotBoxState::Open { parameters, .. } => parameters.clone(),
        };

        let validity: Vec<bool> = ballots
            .par_iter()
            .map(|ballot| self.crypto.validate_ballot(ballot, &parameters))
            .collect();

        let mut report = IngestReport::default();
        let mut state = self.state.lock();
        let tally = match &mut *state {
            BallotBoxState::Open { tally, .. } => tally,
            BallotBoxState::NotOpened => return Err(Error::VotingNotOpen),
            BallotBoxState::Closed { .. } => return Err(Error::BallotBoxClosed),
        };
        for (ballot, valid) in ballots.iter().zip(validity) {
            let ballot_id = self.crypto.ballot_id(ballot).to_string();
            if !valid {
                warn!(ballot_id = %ballot_id, "rejected invalid ballot");
                report.rejected.push((
                    ballot_id.clone(),
                    Error::InvalidBallot { ballot_id },
                ));
                continue;
            }
            match self.crypto.tally_ballot(ballot, tally) {
                Ok(()) => report.accepted.push(ballot_id),
                Err(err) => {
                    warn!(ballot_id = %ballot_id, error = %err, "rejected ballot");
                    report.rejected.push((ballot_id, Error::cryptography(err)));
                }
            }
        }
        debug!(
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            "ballot batch ingested"
        );

        Ok(report)
    }

    /// A copy of the cast tally, while the box is open or after it is sealed.
    ///
    /// # Errors
    ///
    /// - `VotingNotOpen` before `start_vote`
    pub fn tally(&self) -> Result<C::Tally, Error> {
        match &*self.state.lock() {
            BallotBoxState::NotOpened => Err(Error::VotingNotOpen),
            BallotBoxState::Open { tally, .. } | BallotBoxState::Closed { tally } => {
                Ok(tally.clone())
            }
        }
    }
}
