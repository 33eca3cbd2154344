// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Proof of equality of discrete logarithms.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::group::{hash_to_scalar, Element, Scalar};

/**
 * Proof of equality of discrete logarithms.
 *
 * Given public values `y_0`, `g_0`, `y_1`, `g_1`, and a secret
 * `secret_x` proves equality of logarithms such that `y_0 = g_0^secret_x`
 * and `y_1 = g_1^secret_x`.
 *
 * # Examples
 * ```
 * use cryptography::group::{Element, Scalar};
 * use cryptography::zkp::dlogeq::DlogEqProof;
 *
 * let mut rng = rand::rngs::OsRng;
 * let g = Element::generator();
 * let g_1 = Element::random(&mut rng);
 * let secret_x = Scalar::random(&mut rng);
 * let public_y_0 = g.exp(&secret_x);
 * let public_y_1 = g_1.exp(&secret_x);
 *
 * // Set to some relevant context value
 * let proof_context = &[];
 * let proof = DlogEqProof::prove(&secret_x, &g, &public_y_0, &g_1, &public_y_1, proof_context, &mut rng);
 *
 * assert!(proof.verify(&g, &public_y_0, &g_1, &public_y_1, proof_context));
 * ```
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlogEqProof {
    /// Commitment 1
    pub big_a_0: Element,
    /// Commitment 2
    pub big_a_1: Element,
    /// Challenge response
    pub k: Scalar,
}

impl DlogEqProof {
    /// Prove equality of discrete logarithms such that `y0 = g0^secret_x`
    /// and `y1 = g1^secret_x`.
    ///
    /// # Parameters
    ///
    /// - `secret_x`: The secret scalar
    /// - `g0`: The first group element base, public
    /// - `y0`: The first group element `y0` = `g0^secret_x`, public
    /// - `g1`: The second group element base, public
    /// - `y1`: The second group element `y1` = `g1^secret_x`, public
    /// - `proof_context`: proof context label
    pub fn prove<R: RngCore + CryptoRng>(
        secret_x: &Scalar,
        g0: &Element,
        y0: &Element,
        g1: &Element,
        y1: &Element,
        proof_context: &[u8],
        rng: &mut R,
    ) -> Self {
        let a = Scalar::random(rng);
        let big_a_0 = g0.exp(&a);
        let big_a_1 = g1.exp(&a);

        let v = Self::challenge(g0, g1, y0, y1, &big_a_0, &big_a_1, proof_context);
        let k = a.add(&v.mul(secret_x));

        DlogEqProof {
            big_a_0,
            big_a_1,
            k,
        }
    }

    /// Verify this proof of equality of discrete logarithms.
    ///
    /// Returns `true` if the proof is valid, `false` otherwise.
    #[must_use]
    pub fn verify(
        &self,
        g0: &Element,
        y0: &Element,
        g1: &Element,
        y1: &Element,
        proof_context: &[u8],
    ) -> bool {
        let v = Self::challenge(g0, g1, y0, y1, &self.big_a_0, &self.big_a_1, proof_context);

        let check1 = y0.exp(&v).mul(&self.big_a_0) == g0.exp(&self.k);
        let check2 = y1.exp(&v).mul(&self.big_a_1) == g1.exp(&self.k);

        check1 && check2
    }

    /// Domain separation tags for the challenge input
    const DS_TAGS: [&'static [u8]; 7] = [
        b"g0",
        b"g1",
        b"y0",
        b"y1",
        b"big_a_0",
        b"big_a_1",
        b"dlogeq_proof_context",
    ];

    fn challenge(
        g0: &Element,
        g1: &Element,
        y0: &Element,
        y1: &Element,
        big_a_0: &Element,
        big_a_1: &Element,
        proof_context: &[u8],
    ) -> Scalar {
        let encoded = [
            g0.to_bytes(),
            g1.to_bytes(),
            y0.to_bytes(),
            y1.to_bytes(),
            big_a_0.to_bytes(),
            big_a_1.to_bytes(),
        ];
        let mut input: Vec<&[u8]> = encoded.iter().map(|e| e.as_slice()).collect();
        input.push(proof_context);

        hash_to_scalar(&input, &Self::DS_TAGS)
    }
}
