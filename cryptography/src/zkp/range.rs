// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Disjunctive Chaum-Pedersen proof that an exponential ElGamal ciphertext
//! encrypts a value in `0..=bound`.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::elgamal::{Ciphertext, PublicKey};
use crate::group::{hash_to_scalar, Element, Scalar};
use crate::utils::Error;

/**
 * One branch of a [`RangeProof`], stating that the ciphertext encrypts
 * the branch index `j`: `pad = g^r` and `data / g^j = y^r`.
 *
 * Exactly one branch of an honest proof is real; the others are simulated
 * from chosen challenges and responses.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBranch {
    /// Commitment against the generator
    pub big_a: Element,
    /// Commitment against the public key
    pub big_b: Element,
    /// Branch challenge
    pub challenge: Scalar,
    /// Challenge response
    pub response: Scalar,
}

/**
 * Proof that an exponential `ElGamal` ciphertext encrypts one of
 * `0..=bound`, without revealing which.
 *
 * The branch challenges must sum to the Fiat-Shamir challenge computed
 * over every commitment, so a prover can simulate all branches but one.
 *
 * # Examples
 * ```
 * use cryptography::elgamal::{Ciphertext, KeyPair};
 * use cryptography::group::Scalar;
 * use cryptography::zkp::range::RangeProof;
 *
 * let mut rng = rand::rngs::OsRng;
 * let keypair = KeyPair::generate(&mut rng);
 * let r = Scalar::random(&mut rng);
 * let ciphertext = Ciphertext::encrypt_exp(1, &r, &keypair.pkey);
 *
 * let proof = RangeProof::prove(&ciphertext, 1, 1, &r, &keypair.pkey, b"selection", &mut rng).unwrap();
 * assert!(proof.verify(&ciphertext, 1, &keypair.pkey, b"selection"));
 * ```
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeProof {
    pub branches: Vec<RangeBranch>,
}

impl RangeProof {
    /// Prove that `ciphertext`, the encryption of `value` under `key` with
    /// randomness `r`, encrypts a value in `0..=bound`.
    ///
    /// # Errors
    ///
    /// - `ValueOutOfRange` if `value > bound`
    pub fn prove<R: RngCore + CryptoRng>(
        ciphertext: &Ciphertext,
        value: u64,
        bound: u64,
        r: &Scalar,
        key: &PublicKey,
        proof_context: &[u8],
        rng: &mut R,
    ) -> Result<Self, Error> {
        if value > bound {
            return Err(Error::ValueOutOfRange { value, bound });
        }
        let g = Element::generator();

        // Simulated branches get a chosen challenge and response; the real
        // branch commits honestly with a fresh nonce.
        let nonce = Scalar::random(rng);
        let mut branches: Vec<RangeBranch> = (0..=bound)
            .map(|j| {
                if j == value {
                    RangeBranch {
                        big_a: g.exp(&nonce),
                        big_b: key.y.exp(&nonce),
                        challenge: Scalar::zero(),
                        response: Scalar::zero(),
                    }
                } else {
                    let challenge = Scalar::random(rng);
                    let response = Scalar::random(rng);
                    let shifted = ciphertext.data.div(&Element::g_exp_u64(j));
                    RangeBranch {
                        big_a: g.exp(&response).div(&ciphertext.pad.exp(&challenge)),
                        big_b: key.y.exp(&response).div(&shifted.exp(&challenge)),
                        challenge,
                        response,
                    }
                }
            })
            .collect();

        let c = Self::challenge(ciphertext, key, &branches, proof_context);
        let simulated: Scalar = branches
            .iter()
            .enumerate()
            .filter(|(j, _)| *j as u64 != value)
            .map(|(_, b)| b.challenge)
            .sum();

        let real = &mut branches[value as usize];
        real.challenge = c.sub(&simulated);
        real.response = nonce.add(&real.challenge.mul(r));

        Ok(RangeProof { branches })
    }

    /// Verify this proof against `ciphertext`, `bound` and `key`.
    ///
    /// Returns `true` if the proof is valid, `false` otherwise.
    #[must_use]
    pub fn verify(
        &self,
        ciphertext: &Ciphertext,
        bound: u64,
        key: &PublicKey,
        proof_context: &[u8],
    ) -> bool {
        if self.branches.len() as u64 != bound.saturating_add(1) {
            return false;
        }
        let g = Element::generator();

        let c = Self::challenge(ciphertext, key, &self.branches, proof_context);
        let challenges: Scalar = self.branches.iter().map(|b| b.challenge).sum();
        if challenges != c {
            return false;
        }

        self.branches.iter().enumerate().all(|(j, b)| {
            let shifted = ciphertext.data.div(&Element::g_exp_u64(j as u64));
            let check1 = g.exp(&b.response) == b.big_a.mul(&ciphertext.pad.exp(&b.challenge));
            let check2 = key.y.exp(&b.response) == b.big_b.mul(&shifted.exp(&b.challenge));
            check1 && check2
        })
    }

    fn challenge(
        ciphertext: &Ciphertext,
        key: &PublicKey,
        branches: &[RangeBranch],
        proof_context: &[u8],
    ) -> Scalar {
        let mut encoded: Vec<[u8; 32]> = vec![
            key.y.to_bytes(),
            ciphertext.pad.to_bytes(),
            ciphertext.data.to_bytes(),
        ];
        let mut tags: Vec<&[u8]> = vec![&b"public_key"[..], &b"pad"[..], &b"data"[..]];
        for b in branches {
            encoded.push(b.big_a.to_bytes());
            encoded.push(b.big_b.to_bytes());
            tags.push(b"big_a");
            tags.push(b"big_b");
        }

        let mut input: Vec<&[u8]> = encoded.iter().map(|e| e.as_slice()).collect();
        input.push(proof_context);
        tags.push(b"range_proof_context");

        hash_to_scalar(&input, &tags)
    }
}
