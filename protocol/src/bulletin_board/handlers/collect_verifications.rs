// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the step handler for the `CollectVerifications`
//! phase, the last phase of the key ceremony. When every guardian has
//! confirmed its partial keys, the guardian public keys are combined into
//! the joint election key, the election parameters are built from it, and
//! the joint key is published in `end_key_ceremony`.

use super::*;
use crate::messages::{EndKeyCeremonyMsg, TrusteeVerificationMsg};

impl StepHandler for CollectVerifications {
    fn phase(&self) -> Phase {
        Phase::CollectVerifications
    }

    fn accepted(&self) -> &'static [MessageType] {
        &[MessageType::TrusteeVerification]
    }

    fn process<C: ElectionCryptography>(
        &mut self,
        message_type: MessageType,
        message: &Message,
        context: &mut ElectionContext<C>,
    ) -> Result<StepOutcome, Error> {
        let content: TrusteeVerificationMsg = message.decode()?;
        let seen = self.received.contains(&content.guardian_id);
        context.admit(message_type, &content.guardian_id, seen)?;

        let contributors = self.received.len() + usize::from(!seen);
        if !context.quorum_reached(contributors) {
            debug!(guardian_id = %content.guardian_id, "verification recorded");
            self.received.insert(content.guardian_id);
            return Ok(StepOutcome::stay());
        }
        log_quorum(message_type, contributors);

        // Nothing is recorded unless the joint key can be built.
        let (joint_key, parameters, outbound) = build_joint_key(context)?;
        context.install_joint_key(joint_key, parameters)?;
        self.received.insert(content.guardian_id);
        info!(
            guardians = context.guardian_public_keys.len(),
            "joint public key built"
        );

        Ok(StepOutcome::advance(StartVote).emit(outbound))
    }
}

fn build_joint_key<C: ElectionCryptography>(
    context: &ElectionContext<C>,
) -> Result<(C::JointPublicKey, C::ElectionParameters, OutboundMessage), Error> {
    let manifest = context
        .manifest
        .as_ref()
        .ok_or(Error::MissingState("election manifest"))?;
    let keys: Vec<&C::GuardianPublicKey> = context.guardian_public_keys.values().collect();

    let joint_key = context
        .crypto
        .combine_public_keys(&keys)
        .map_err(Error::cryptography)?;
    let parameters = context
        .crypto
        .build_election_parameters(&joint_key, manifest, context.number_of_guardians)
        .map_err(Error::cryptography)?;

    let content = serde_json::to_value(EndKeyCeremonyMsg {
        joint_key: &joint_key,
    })?;
    let outbound = OutboundMessage::with_content(MessageType::EndKeyCeremony, content);

    Ok((joint_key, parameters, outbound))
}
