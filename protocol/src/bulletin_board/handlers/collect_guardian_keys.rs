// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the step handler for the `CollectGuardianKeys`
//! phase. Each guardian posts its election public key; the keys are kept
//! in the election context, where the verification phase combines them.
//! Key material is not checked here.

use super::*;
use crate::messages::TrusteeElectionKeysMsg;

impl StepHandler for CollectGuardianKeys {
    fn phase(&self) -> Phase {
        Phase::CollectGuardianKeys
    }

    fn accepted(&self) -> &'static [MessageType] {
        &[MessageType::TrusteeElectionKeys]
    }

    fn process<C: ElectionCryptography>(
        &mut self,
        message_type: MessageType,
        message: &Message,
        context: &mut ElectionContext<C>,
    ) -> Result<StepOutcome, Error> {
        let content: TrusteeElectionKeysMsg<C::GuardianPublicKey> = message.decode()?;
        let seen = context
            .guardian_public_keys
            .contains_key(&content.guardian_id);
        context.admit(message_type, &content.guardian_id, seen)?;

        debug!(guardian_id = %content.guardian_id, seen, "guardian public key recorded");
        context
            .guardian_public_keys
            .insert(content.guardian_id, content.election_public_key);

        let contributors = context.guardian_public_keys.len();
        if context.quorum_reached(contributors) {
            log_quorum(message_type, contributors);
            Ok(StepOutcome::advance(CollectPartialKeys::default()))
        } else {
            Ok(StepOutcome::stay())
        }
    }
}
