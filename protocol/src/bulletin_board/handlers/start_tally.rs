// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the step handler for the `StartTally` phase. It
//! seals the ballot box; the sealed tally is what the guardians decrypt.

use super::*;

impl StepHandler for StartTally {
    fn phase(&self) -> Phase {
        Phase::StartTally
    }

    fn accepted(&self) -> &'static [MessageType] {
        &[MessageType::StartTally]
    }

    fn process<C: ElectionCryptography>(
        &mut self,
        _message_type: MessageType,
        _message: &Message,
        context: &mut ElectionContext<C>,
    ) -> Result<StepOutcome, Error> {
        let tally = context.ballot_box.close()?;
        context.tally = Some(tally);
        info!("ballot box sealed");
        Ok(StepOutcome::advance(CollectShares::default()))
    }
}
