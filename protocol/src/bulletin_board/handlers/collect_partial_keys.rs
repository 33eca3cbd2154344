// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the step handler for the `CollectPartialKeys` phase.
//! Partial key backups travel between guardians; the board only counts
//! which guardians have sent theirs.

use super::*;
use crate::messages::TrusteePartialKeysMsg;

impl StepHandler for CollectPartialKeys {
    fn phase(&self) -> Phase {
        Phase::CollectPartialKeys
    }

    fn accepted(&self) -> &'static [MessageType] {
        &[MessageType::TrusteePartialElectionKeys]
    }

    fn process<C: ElectionCryptography>(
        &mut self,
        message_type: MessageType,
        message: &Message,
        context: &mut ElectionContext<C>,
    ) -> Result<StepOutcome, Error> {
        let content: TrusteePartialKeysMsg = message.decode()?;

        if count_contribution(&mut self.received, message_type, content.guardian_id, context)? {
            log_quorum(message_type, self.received.len());
            Ok(StepOutcome::advance(CollectVerifications::default()))
        } else {
            Ok(StepOutcome::stay())
        }
    }
}
