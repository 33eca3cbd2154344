// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

pub mod cast_vote;
pub mod collect_guardian_keys;
pub mod collect_partial_keys;
pub mod collect_shares;
pub mod collect_verifications;
pub mod create_election;
pub mod start_key_ceremony;
pub mod start_tally;
pub mod start_vote;

use std::collections::BTreeSet;

use crate::bulletin_board::context::ElectionContext;
use crate::cryptography::ElectionCryptography;
use crate::error::Error;
use crate::messages::{ContestId, GuardianId, Message, MessageType, OutboundMessage, SelectionId};

use super::top_level_actor::{Phase, Step};

use enum_dispatch::enum_dispatch;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CreateElection;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StartKeyCeremony;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CollectGuardianKeys;

#[derive(Debug, Clone, Default)]
pub(crate) struct CollectPartialKeys {
    pub(crate) received: BTreeSet<GuardianId>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CollectVerifications {
    pub(crate) received: BTreeSet<GuardianId>,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StartVote;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CastVote;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StartTally;

#[derive(Debug, Clone, Default)]
pub(crate) struct CollectShares {
    /// The tally selections to decrypt, fixed when the step is set up.
    pub(crate) selections: Vec<(ContestId, SelectionId)>,
    pub(crate) published: bool,
}

/// What a step did with a message: an optional message to emit, and the
/// step to move to, if the phase is complete.
#[derive(Debug, Default)]
pub(crate) struct StepOutcome {
    pub(crate) outbound: Option<OutboundMessage>,
    pub(crate) next: Option<Step>,
}

impl StepOutcome {
    pub(crate) fn stay() -> Self {
        StepOutcome::default()
    }

    pub(crate) fn advance(next: impl Into<Step>) -> Self {
        StepOutcome {
            outbound: None,
            next: Some(next.into()),
        }
    }

    pub(crate) fn emit(mut self, outbound: OutboundMessage) -> Self {
        self.outbound = Some(outbound);
        self
    }
}

#[enum_dispatch]
pub(crate) trait StepHandler {
    fn phase(&self) -> Phase;

    /// The message types this step handles; anything else is ignored.
    fn accepted(&self) -> &'static [MessageType];

    fn accepts(&self, message_type: MessageType) -> bool {
        self.accepted().contains(&message_type)
    }

    /// Runs once, when the step becomes the active step.
    fn setup<C: ElectionCryptography>(&mut self, _context: &ElectionContext<C>) {}

    /// Handles a message of an accepted type.
    ///
    /// On error neither the step nor the context has changed.
    fn process<C: ElectionCryptography>(
        &mut self,
        message_type: MessageType,
        message: &Message,
        context: &mut ElectionContext<C>,
    ) -> Result<StepOutcome, Error>;
}

/// Shared by the phases that only count one message per guardian.
fn count_contribution<C: ElectionCryptography>(
    received: &mut BTreeSet<GuardianId>,
    message_type: MessageType,
    guardian_id: GuardianId,
    context: &ElectionContext<C>,
) -> Result<bool, Error> {
    context.admit(message_type, &guardian_id, received.contains(&guardian_id))?;
    debug!(%message_type, guardian_id = %guardian_id, "contribution recorded");
    received.insert(guardian_id);
    Ok(context.quorum_reached(received.len()))
}

fn log_quorum(message_type: MessageType, contributors: usize) {
    info!(%message_type, contributors, "quorum reached");
}
