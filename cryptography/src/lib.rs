// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Election cryptography for the tallyboard bulletin board.
//!
//! Everything here is built on the Ristretto255 group: guardian keys and the
//! joint election key are `ElGamal` keys, ballot selections are exponential
//! `ElGamal` ciphertexts carrying disjunctive Chaum-Pedersen range proofs,
//! and tallies are decrypted by combining one Chaum-Pedersen-proven partial
//! decryption per guardian.
//!
//! # Examples
//!
//! ```
//! use cryptography::elgamal::{combine_public_keys, KeyPair};
//! use cryptography::elgamal::Ciphertext;
//! use cryptography::group::Scalar;
//!
//! let mut rng = rand::rngs::OsRng;
//! let guardians: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate(&mut rng)).collect();
//! let joint_key = combine_public_keys(guardians.iter().map(|g| &g.pkey)).unwrap();
//!
//! let r = Scalar::random(&mut rng);
//! let ciphertext = Ciphertext::encrypt_exp(1, &r, &joint_key);
//! assert_ne!(ciphertext, Ciphertext::zero());
//! ```

/// Election manifests and the parameters derived from the joint key.
pub mod election;
/// `ElGamal` keys and exponential `ElGamal` ciphertexts.
pub mod elgamal;
/// Ristretto255 elements, scalars and hashing into scalars.
pub mod group;
/// Zero knowledge proofs used by ballots and decryption shares.
pub mod zkp;

pub mod ballot;
pub mod decryption;
pub mod tally;

/// Errors and serialization helpers.
pub mod utils;

pub use utils::error::Error;
