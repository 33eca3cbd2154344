// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Zero knowledge proofs
//!
//! # [Discrete log equality][`crate::zkp::dlogeq`]
//!
//! Proves equality of discrete logarithms (Chaum-Pedersen).
//!
//! This proof is used to verify partial decryption correctness: a guardian
//! shows that its partial decryption uses the same secret as its public key.
//! See [`compute_decryption_share`][`crate::decryption::compute_decryption_share`]
//!
//! # [Range][`crate::zkp::range`]
//!
//! Disjunctive Chaum-Pedersen proof that an exponential `ElGamal`
//! ciphertext encrypts one of `0..=bound`.
//!
//! This proof is used for ballot well-formedness: every selection encrypts
//! `0` or `1`, and every contest encrypts at most its number of allowed votes.

/// Discrete logarithm equality proofs.
pub mod dlogeq;

/// Disjunctive range proofs.
pub mod range;
