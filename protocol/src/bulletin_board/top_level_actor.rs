// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the implementation of the top-level (and only) actor
//! of the bulletin board. The board owns the election context and the
//! active step; every inbound message goes to the active step, which may
//! emit a message, move the board to the next step, or both. Ballots reach
//! the tally through the ballot box, which can be used from other threads
//! while the board handles messages.

use std::sync::Arc;

use enum_dispatch::enum_dispatch;
use serde_json::Value;
use strum::Display;
use tracing::{debug, info};

use crate::ballot_box::BallotBox;
use crate::bulletin_board::context::ElectionContext;
use crate::bulletin_board::handlers::*;
use crate::config::BoardConfig;
use crate::cryptography::ElectionCryptography;
use crate::error::Error;
use crate::messages::{GuardianId, Message, MessageType, OutboundMessage};

/// The phases of an election, in order. A board never returns to an
/// earlier phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Phase {
    CreateElection,
    StartKeyCeremony,
    CollectGuardianKeys,
    CollectPartialKeys,
    CollectVerifications,
    StartVote,
    CastVote,
    StartTally,
    CollectShares,
}

/// The steps of the board, one per phase, with their phase-local state.
#[enum_dispatch(StepHandler)]
#[derive(Debug, Clone)]
pub(crate) enum Step {
    CreateElection,
    StartKeyCeremony,
    CollectGuardianKeys,
    CollectPartialKeys,
    CollectVerifications,
    StartVote,
    CastVote,
    StartTally,
    CollectShares,
}

/// The bulletin board for one election.
pub struct BulletinBoard<C: ElectionCryptography> {
    // Data shared across all steps.
    pub(crate) context: ElectionContext<C>,

    // The active step, including its phase-local data.
    pub(crate) step: Step,
}

impl<C: ElectionCryptography> BulletinBoard<C> {
    /// Create a new board, awaiting `create_election`.
    pub fn new(crypto: C, config: BoardConfig) -> Self {
        BulletinBoard {
            context: ElectionContext::new(Arc::new(crypto), config),
            step: Step::from(CreateElection),
        }
    }

    /// Handle an inbound message.
    ///
    /// A message whose type the active step does not accept, including a
    /// type the board does not know, is ignored and `Ok(None)` is returned.
    /// Otherwise the active step handles it; if that completes the phase,
    /// the next step is set up and becomes active before this returns.
    ///
    /// # Errors
    ///
    /// Any error from the active step. The board is unchanged when an
    /// error is returned.
    pub fn submit(&mut self, message: &Message) -> Result<Option<OutboundMessage>, Error> {
        let phase = self.step.phase();
        let message_type = match message.message_type.parse::<MessageType>() {
            Ok(message_type) if self.step.accepts(message_type) => message_type,
            _ => {
                debug!(message_type = %message.message_type, %phase, "message ignored");
                return Ok(None);
            }
        };

        let outcome = self.step.process(message_type, message, &mut self.context)?;

        if let Some(outbound) = &outcome.outbound {
            info!(message_type = %outbound.message_type, %phase, "message emitted");
        }
        if let Some(mut next) = outcome.next {
            next.setup(&self.context);
            info!(from = %phase, to = %next.phase(), "phase complete");
            self.step = next;
        }

        Ok(outcome.outbound)
    }

    /// Decode and handle an inbound message.
    ///
    /// # Errors
    ///
    /// - `MalformedEnvelope` if `json` is not a message envelope
    /// - Any error from [`BulletinBoard::submit`]
    pub fn submit_json(&mut self, json: &str) -> Result<Option<OutboundMessage>, Error> {
        let message: Message = serde_json::from_str(json).map_err(Error::MalformedEnvelope)?;
        self.submit(&message)
    }

    /// Decode a ballot and add it to the tally. See [`BallotBox::add_ballot`].
    ///
    /// # Errors
    ///
    /// - `MalformedPayload` if `ballot` does not decode
    /// - Any error from [`BallotBox::add_ballot`]
    pub fn add_ballot(&self, ballot: &Value) -> Result<(), Error> {
        let ballot = Message::new(MessageType::BallotAdd, ballot.clone()).decode::<C::Ballot>()?;
        self.context.ballot_box.add_ballot(&ballot)
    }

    /// The cast tally, as a `tally.cast` message.
    ///
    /// # Errors
    ///
    /// - `VotingNotOpen` before `start_vote`
    pub fn get_tally_cast(&self) -> Result<OutboundMessage, Error> {
        let tally = self.context.ballot_box.tally()?;
        Ok(OutboundMessage::with_content(
            MessageType::TallyCast,
            serde_json::to_value(tally)?,
        ))
    }

    /// A handle to the ballot box, for ingestion from other threads.
    #[must_use]
    pub fn ballot_box(&self) -> BallotBox<C> {
        self.context.ballot_box.clone()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.step.phase()
    }

    #[must_use]
    pub fn number_of_guardians(&self) -> usize {
        self.context.number_of_guardians
    }

    pub fn guardian_public_keys(&self) -> impl Iterator<Item = (&GuardianId, &C::GuardianPublicKey)> {
        self.context.guardian_public_keys.iter()
    }

    #[must_use]
    pub fn joint_public_key(&self) -> Option<&C::JointPublicKey> {
        self.context.joint_public_key.as_ref()
    }

    #[must_use]
    pub fn election_parameters(&self) -> Option<&C::ElectionParameters> {
        self.context.election_parameters.as_ref()
    }

    #[must_use]
    pub fn cryptography(&self) -> &C {
        &self.context.crypto
    }
}
