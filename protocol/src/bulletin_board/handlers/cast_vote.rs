// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the step handler for the `CastVote` phase. It
//! handles two message types: `vote.cast`, which validates a ballot
//! against the election, and `end_vote`, which ends casting. Accepted
//! ballots reach the tally through the ballot box, not through this step;
//! the box stays open for them until `start_tally`.

use super::*;
use tracing::warn;

impl StepHandler for CastVote {
    fn phase(&self) -> Phase {
        Phase::CastVote
    }

    fn accepted(&self) -> &'static [MessageType] {
        &[MessageType::VoteCast, MessageType::EndVote]
    }

    fn process<C: ElectionCryptography>(
        &mut self,
        message_type: MessageType,
        message: &Message,
        context: &mut ElectionContext<C>,
    ) -> Result<StepOutcome, Error> {
        match message_type {
            MessageType::EndVote => {
                info!("voting ended");
                Ok(StepOutcome::advance(StartTally))
            }
            _ => {
                let ballot: C::Ballot = message.decode()?;
                let ballot_id = context.crypto.ballot_id(&ballot);
                if context.crypto.validate_ballot(&ballot, context.parameters()?) {
                    debug!(ballot_id, "ballot accepted");
                    Ok(StepOutcome::stay())
                } else {
                    warn!(ballot_id, "ballot rejected");
                    Err(Error::InvalidBallot {
                        ballot_id: ballot_id.to_string(),
                    })
                }
            }
        }
    }
}
