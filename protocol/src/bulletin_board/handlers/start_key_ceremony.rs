// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

use super::*;

impl StepHandler for StartKeyCeremony {
    fn phase(&self) -> Phase {
        Phase::StartKeyCeremony
    }

    fn accepted(&self) -> &'static [MessageType] {
        &[MessageType::StartKeyCeremony]
    }

    fn process<C: ElectionCryptography>(
        &mut self,
        _message_type: MessageType,
        _message: &Message,
        _context: &mut ElectionContext<C>,
    ) -> Result<StepOutcome, Error> {
        Ok(StepOutcome::advance(CollectGuardianKeys))
    }
}
