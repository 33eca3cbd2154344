// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the step handler for the `StartVote` phase, which
//! opens the ballot box with an empty tally.

use super::*;

impl StepHandler for StartVote {
    fn phase(&self) -> Phase {
        Phase::StartVote
    }

    fn accepted(&self) -> &'static [MessageType] {
        &[MessageType::StartVote]
    }

    fn process<C: ElectionCryptography>(
        &mut self,
        _message_type: MessageType,
        _message: &Message,
        context: &mut ElectionContext<C>,
    ) -> Result<StepOutcome, Error> {
        let parameters = context.parameters()?;
        let tally = context
            .crypto
            .new_tally(&context.config.tally_object_id, parameters);
        context.ballot_box.open(parameters.clone(), tally)?;
        info!(tally_object_id = %context.config.tally_object_id, "voting opened");

        Ok(StepOutcome::advance(CastVote))
    }
}
