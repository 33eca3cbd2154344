// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the step handler for the `CreateElection` phase,
//! the initial step. It records the number of guardians, which is the
//! quorum for every later phase, and the election manifest, which must
//! be valid before the key ceremony can start.

use super::*;
use crate::messages::CreateElectionMsg;

impl StepHandler for CreateElection {
    fn phase(&self) -> Phase {
        Phase::CreateElection
    }

    fn accepted(&self) -> &'static [MessageType] {
        &[MessageType::CreateElection]
    }

    fn process<C: ElectionCryptography>(
        &mut self,
        _message_type: MessageType,
        message: &Message,
        context: &mut ElectionContext<C>,
    ) -> Result<StepOutcome, Error> {
        let content: CreateElectionMsg<C::Manifest> = message.decode()?;
        if content.number_of_guardians == 0 {
            return Err(Error::InvalidElection(
                "an election needs at least one guardian".to_string(),
            ));
        }
        context
            .crypto
            .validate_manifest(&content.manifest)
            .map_err(|err| Error::InvalidElection(err.to_string()))?;

        context.number_of_guardians = content.number_of_guardians;
        context.manifest = Some(content.manifest);
        info!(
            number_of_guardians = content.number_of_guardians,
            "election created"
        );

        Ok(StepOutcome::advance(StartKeyCeremony))
    }
}
