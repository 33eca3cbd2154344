// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the step handler for the `CollectShares` phase, the
//! terminal phase. Each guardian posts its partial decryptions of the
//! sealed tally; bundles from guardians outside the key ceremony are
//! refused. Once every guardian's bundle is in, each selection is
//! decrypted from the full set of shares and the results are published in
//! `end_tally`. After publication share messages are no longer accepted.

use std::collections::BTreeMap;

use super::*;
use crate::bulletin_board::context::ShareBundle;
use crate::messages::ContestResult;

impl StepHandler for CollectShares {
    fn phase(&self) -> Phase {
        Phase::CollectShares
    }

    fn accepted(&self) -> &'static [MessageType] {
        &[MessageType::TrusteeShare]
    }

    fn accepts(&self, message_type: MessageType) -> bool {
        !self.published && self.accepted().contains(&message_type)
    }

    fn setup<C: ElectionCryptography>(&mut self, context: &ElectionContext<C>) {
        if let Some(tally) = &context.tally {
            self.selections = context.crypto.cast_selections(tally);
        }
        debug!(selections = self.selections.len(), "awaiting decryption shares");
    }

    fn process<C: ElectionCryptography>(
        &mut self,
        message_type: MessageType,
        message: &Message,
        context: &mut ElectionContext<C>,
    ) -> Result<StepOutcome, Error> {
        let bundle: ShareBundle<C> = message.decode()?;
        let guardian_id = bundle.guardian_id.clone();
        if !context.guardian_public_keys.contains_key(&guardian_id) {
            return Err(Error::UnknownGuardian { guardian_id });
        }
        let seen = context.decryption_shares.contains_key(&guardian_id);
        context.admit(message_type, &guardian_id, seen)?;

        let previous = context.decryption_shares.insert(guardian_id.clone(), bundle);
        debug!(guardian_id = %guardian_id, seen, "decryption shares recorded");

        let contributors = context.decryption_shares.len();
        if !context.quorum_reached(contributors) {
            return Ok(StepOutcome::stay());
        }
        log_quorum(message_type, contributors);

        match self.decrypt_tally(context) {
            Ok(results) => {
                self.published = true;
                info!(contests = results.len(), "tally decrypted");
                let results = serde_json::to_value(results)?;
                Ok(StepOutcome::stay().emit(OutboundMessage::with_results(
                    MessageType::EndTally,
                    results,
                )))
            }
            Err(err) => {
                // Undo the insertion so the guardian can resubmit.
                match previous {
                    Some(previous) => context.decryption_shares.insert(guardian_id, previous),
                    None => context.decryption_shares.remove(&guardian_id),
                };
                Err(err)
            }
        }
    }
}

type TallyResults<C> =
    BTreeMap<ContestId, ContestResult<<C as ElectionCryptography>::PlaintextSelection>>;

impl CollectShares {
    fn decrypt_tally<C: ElectionCryptography>(
        &self,
        context: &ElectionContext<C>,
    ) -> Result<TallyResults<C>, Error> {
        let tally = context
            .tally
            .as_ref()
            .ok_or(Error::MissingState("sealed tally"))?;
        let extended_hash = context.crypto.extended_hash(context.parameters()?);

        let mut results: TallyResults<C> = BTreeMap::new();
        for (contest_id, selection_id) in &self.selections {
            let shares = context
                .decryption_shares
                .iter()
                .map(|(guardian_id, bundle)| {
                    // Shares are checked against the key from the key
                    // ceremony, never the one in the bundle.
                    let key = context
                        .guardian_public_keys
                        .get(guardian_id)
                        .ok_or_else(|| Error::UnknownGuardian {
                            guardian_id: guardian_id.clone(),
                        })?;
                    bundle
                        .share(contest_id, selection_id)
                        .map(|share| (key, share))
                        .ok_or_else(|| Error::MissingShare {
                            guardian_id: guardian_id.clone(),
                            contest_id: contest_id.clone(),
                            selection_id: selection_id.clone(),
                        })
                })
                .collect::<Result<Vec<_>, Error>>()?;

            let plaintext = context
                .crypto
                .combine_partial_decryptions(tally, contest_id, selection_id, &shares, &extended_hash)
                .map_err(Error::cryptography)?;
            results
                .entry(contest_id.clone())
                .or_insert_with(|| ContestResult {
                    object_id: contest_id.clone(),
                    selections: BTreeMap::new(),
                })
                .selections
                .insert(selection_id.clone(), plaintext);
        }

        Ok(results)
    }
}
