// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Partial decryptions of the tally and their combination.
//!
//! Each guardian holds a secret `s_i` with public key `K_i = g^s_i`; the
//! joint key is the product of the `K_i`. For a tally ciphertext
//! `(pad, data)` guardian `i` publishes `M_i = pad^s_i` together with a
//! [`DlogEqProof`] that `log_g K_i = log_pad M_i`. Once every guardian's
//! share is known, `data / prod(M_i) = g^t` and the tally `t` is recovered by
//! a bounded search.

use std::collections::BTreeMap;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::elgamal::{Ciphertext, KeyPair, PublicKey};
use crate::group::{Element, Scalar};
use crate::tally::{CiphertextTally, CiphertextTallySelection, PlaintextTallySelection};
use crate::utils::Error;
use crate::zkp::dlogeq::DlogEqProof;

/// One guardian's partial decryption of one tally ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDecryption {
    /// `M_i = pad^s_i`
    pub share: Element,
    pub proof: DlogEqProof,
}

impl PartialDecryption {
    /// Checks the proof that this share was computed with the secret behind
    /// `guardian_key`.
    #[must_use]
    pub fn verify(
        &self,
        guardian_key: &PublicKey,
        ciphertext: &Ciphertext,
        extended_base_hash: &Scalar,
    ) -> bool {
        self.proof.verify(
            &Element::generator(),
            &guardian_key.y,
            &ciphertext.pad,
            &self.share,
            &extended_base_hash.to_bytes(),
        )
    }
}

/// Computes a guardian's partial decryption of `ciphertext`.
pub fn compute_decryption_share<R: RngCore + CryptoRng>(
    keypair: &KeyPair,
    ciphertext: &Ciphertext,
    extended_base_hash: &Scalar,
    rng: &mut R,
) -> PartialDecryption {
    let share = ciphertext.pad.exp(&keypair.skey);
    let proof = DlogEqProof::prove(
        &keypair.skey,
        &Element::generator(),
        &keypair.pkey.y,
        &ciphertext.pad,
        &share,
        &extended_base_hash.to_bytes(),
        rng,
    );
    PartialDecryption { share, proof }
}

/// Partial decryptions for a whole tally, keyed by contest id and then by
/// selection id.
pub type TallyShares = BTreeMap<String, BTreeMap<String, PartialDecryption>>;

/// Computes a guardian's partial decryption of every selection in `tally`.
pub fn compute_tally_shares<R: RngCore + CryptoRng>(
    keypair: &KeyPair,
    tally: &CiphertextTally,
    extended_base_hash: &Scalar,
    rng: &mut R,
) -> TallyShares {
    tally
        .cast
        .iter()
        .map(|(contest_id, contest)| {
            let selections = contest
                .selections
                .iter()
                .map(|(selection_id, selection)| {
                    let share = compute_decryption_share(
                        keypair,
                        &selection.ciphertext,
                        extended_base_hash,
                        rng,
                    );
                    (selection_id.clone(), share)
                })
                .collect();
            (contest_id.clone(), selections)
        })
        .collect()
}

/// Decrypts a tally selection from one partial decryption per guardian.
///
/// The result does not depend on the order of `shares`.
///
/// # Errors
///
/// - `NoDecryptionShares` if `shares` is empty
/// - `DecryptProofFailed` if any share's proof does not verify against its
///   guardian key
/// - `TallyOutOfRange` if the decrypted value is above `max_tally`
pub fn decrypt_selection_with_decryption_shares(
    selection: &CiphertextTallySelection,
    shares: &[(&PublicKey, &PartialDecryption)],
    extended_base_hash: &Scalar,
    max_tally: u64,
) -> Result<PlaintextTallySelection, Error> {
    if shares.is_empty() {
        return Err(Error::NoDecryptionShares);
    }

    for (index, (key, share)) in shares.iter().enumerate() {
        if !share.verify(key, &selection.ciphertext, extended_base_hash) {
            return Err(Error::DecryptProofFailed(format!(
                "partial decryption {index} for selection {} has an invalid proof",
                selection.object_id
            )));
        }
    }

    let combined: Element = shares.iter().map(|(_, s)| s.share).sum();
    let value = selection.ciphertext.data.div(&combined);
    let tally = discrete_log(&value, max_tally).ok_or(Error::TallyOutOfRange(max_tally))?;

    Ok(PlaintextTallySelection {
        object_id: selection.object_id.clone(),
        tally,
        value,
    })
}

/// Finds `t <= bound` with `g^t = value`.
fn discrete_log(value: &Element, bound: u64) -> Option<u64> {
    let g = Element::generator();
    let mut current = Element::one();
    for t in 0..=bound {
        if current == *value {
            return Some(t);
        }
        current = current.mul(&g);
    }
    None
}
