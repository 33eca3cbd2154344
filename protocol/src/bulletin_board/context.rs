// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This file contains the election context: the state accumulated across
//! all phases of one election. Phase-local state lives in the steps.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::ballot_box::BallotBox;
use crate::config::{BoardConfig, ResubmissionPolicy};
use crate::cryptography::ElectionCryptography;
use crate::error::Error;
use crate::messages::{GuardianId, MessageType, TrusteeShareMsg};

/// A guardian's decryption shares, as submitted in `tally.trustee_share`.
pub type ShareBundle<C> = TrusteeShareMsg<
    <C as ElectionCryptography>::GuardianPublicKey,
    <C as ElectionCryptography>::PartialDecryption,
>;

pub struct ElectionContext<C: ElectionCryptography> {
    pub(crate) crypto: Arc<C>,
    pub(crate) config: BoardConfig,

    /// Fixed by `create_election`; the quorum of every phase.
    pub(crate) number_of_guardians: usize,
    pub(crate) manifest: Option<C::Manifest>,

    pub(crate) guardian_public_keys: BTreeMap<GuardianId, C::GuardianPublicKey>,
    pub(crate) joint_public_key: Option<C::JointPublicKey>,
    pub(crate) election_parameters: Option<C::ElectionParameters>,

    pub(crate) ballot_box: BallotBox<C>,
    /// The tally as sealed by `start_tally`.
    pub(crate) tally: Option<C::Tally>,
    pub(crate) decryption_shares: BTreeMap<GuardianId, ShareBundle<C>>,
}

impl<C: ElectionCryptography> ElectionContext<C> {
    pub(crate) fn new(crypto: Arc<C>, config: BoardConfig) -> Self {
        ElectionContext {
            ballot_box: BallotBox::new(Arc::clone(&crypto)),
            crypto,
            config,
            number_of_guardians: 0,
            manifest: None,
            guardian_public_keys: BTreeMap::new(),
            joint_public_key: None,
            election_parameters: None,
            tally: None,
            decryption_shares: BTreeMap::new(),
        }
    }

    /// Whether `contributors` distinct guardians make a quorum.
    pub(crate) fn quorum_reached(&self, contributors: usize) -> bool {
        self.number_of_guardians > 0 && contributors >= self.number_of_guardians
    }

    /// Applies the resubmission policy to a contribution from `guardian_id`;
    /// `seen` says whether the current phase has already recorded one.
    pub(crate) fn admit(
        &self,
        message_type: MessageType,
        guardian_id: &str,
        seen: bool,
    ) -> Result<(), Error> {
        match (seen, self.config.resubmission_policy) {
            (true, ResubmissionPolicy::Reject) => Err(Error::DuplicateContribution {
                message_type: message_type.to_string(),
                guardian_id: guardian_id.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Installs the joint key and the parameters built from it. Both are
    /// installed at most once.
    pub(crate) fn install_joint_key(
        &mut self,
        joint_public_key: C::JointPublicKey,
        parameters: C::ElectionParameters,
    ) -> Result<(), Error> {
        if self.joint_public_key.is_some() || self.election_parameters.is_some() {
            return Err(Error::InvalidElection(
                "the joint public key is already installed".to_string(),
            ));
        }
        self.joint_public_key = Some(joint_public_key);
        self.election_parameters = Some(parameters);
        Ok(())
    }

    pub(crate) fn parameters(&self) -> Result<&C::ElectionParameters, Error> {
        self.election_parameters
            .as_ref()
            .ok_or(Error::MissingState("election parameters"))
    }
}
