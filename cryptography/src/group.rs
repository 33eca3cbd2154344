// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Group over the Ristretto group (over curve25519)
//!
//! The group operation is written multiplicatively, as in the protocol
//! literature: `mul` combines two elements and `exp` raises an element to a
//! scalar power, even though the underlying curve arithmetic is additive.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar as DalekScalar;
use curve25519_dalek::traits::Identity;
use rand::{CryptoRng, RngCore};
use sha3::{Digest, Sha3_512};

use crate::utils::error::Error;

/// Byte length of a compressed element or a canonical scalar.
pub const ENCODED_LEN: usize = 32;

/**
 * A Ristretto255 group element.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element(pub RistrettoPoint);

impl Element {
    /// Returns the default group generator.
    #[inline]
    #[must_use]
    pub fn generator() -> Self {
        Element(RISTRETTO_BASEPOINT_POINT)
    }

    /// Returns the identity element.
    #[inline]
    #[must_use]
    pub fn one() -> Self {
        Element(RistrettoPoint::identity())
    }

    /// Returns the generator raised to `scalar`.
    #[inline]
    #[must_use]
    pub fn g_exp(scalar: &Scalar) -> Self {
        Element(RistrettoPoint::mul_base(&scalar.0))
    }

    /// Returns the generator raised to a small integer.
    #[inline]
    #[must_use]
    pub fn g_exp_u64(value: u64) -> Self {
        Self::g_exp(&Scalar::from_u64(value))
    }

    /// Returns a uniformly random element.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Element(RistrettoPoint::random(rng))
    }

    #[inline]
    #[must_use]
    pub fn exp(&self, scalar: &Scalar) -> Self {
        Element(self.0 * scalar.0)
    }

    #[inline]
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Element(self.0 + other.0)
    }

    #[inline]
    #[must_use]
    pub fn div(&self, other: &Self) -> Self {
        Element(self.0 - other.0)
    }

    /// Returns the compressed encoding of this element.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        self.0.compress().to_bytes()
    }

    /// Decodes a compressed element.
    ///
    /// # Errors
    ///
    /// - `DeserializationError` if the input has the wrong length or is not
    ///   the canonical encoding of a group element
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let array: [u8; ENCODED_LEN] = bytes.try_into().map_err(|_| {
            Error::DeserializationError(format!(
                "expected {ENCODED_LEN} bytes for an element, got {}",
                bytes.len()
            ))
        })?;
        CompressedRistretto(array)
            .decompress()
            .map(Element)
            .ok_or_else(|| Error::DeserializationError("invalid Ristretto encoding".to_string()))
    }
}

/**
 * A scalar of the Ristretto255 group.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar(pub DalekScalar);

impl Scalar {
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Scalar(DalekScalar::ZERO)
    }

    #[inline]
    #[must_use]
    pub fn one() -> Self {
        Scalar(DalekScalar::ONE)
    }

    #[inline]
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Scalar(DalekScalar::from(value))
    }

    /// Returns a uniformly random scalar.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Scalar(DalekScalar::random(rng))
    }

    #[inline]
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Scalar(self.0 + other.0)
    }

    #[inline]
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        Scalar(self.0 - other.0)
    }

    #[inline]
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Scalar(self.0 * other.0)
    }

    #[inline]
    #[must_use]
    pub fn neg(&self) -> Self {
        Scalar(-self.0)
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        self.0.to_bytes()
    }

    /// Decodes a canonical scalar.
    ///
    /// # Errors
    ///
    /// - `DeserializationError` if the input has the wrong length or is not
    ///   reduced modulo the group order
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let array: [u8; ENCODED_LEN] = bytes.try_into().map_err(|_| {
            Error::DeserializationError(format!(
                "expected {ENCODED_LEN} bytes for a scalar, got {}",
                bytes.len()
            ))
        })?;
        Option::<DalekScalar>::from(DalekScalar::from_canonical_bytes(array))
            .map(Scalar)
            .ok_or_else(|| Error::DeserializationError("non-canonical scalar".to_string()))
    }
}

impl std::iter::Sum for Scalar {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Scalar::zero(), |acc, s| acc.add(&s))
    }
}

impl std::iter::Sum for Element {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Element::one(), |acc, e| acc.mul(&e))
    }
}

/// Hashes the given inputs into a scalar with SHA3-512.
///
/// Each input is absorbed after its domain separation tag; both are length
/// prefixed, so distinct input lists never share an encoding. `input_slices`
/// and `ds_tags` must have the same length.
#[must_use]
pub fn hash_to_scalar(input_slices: &[&[u8]], ds_tags: &[&[u8]]) -> Scalar {
    debug_assert_eq!(input_slices.len(), ds_tags.len());

    let mut hasher = Sha3_512::new();
    for (input, tag) in input_slices.iter().zip(ds_tags.iter()) {
        hasher.update((tag.len() as u64).to_be_bytes());
        hasher.update(tag);
        hasher.update((input.len() as u64).to_be_bytes());
        hasher.update(input);
    }

    Scalar(DalekScalar::from_hash(hasher))
}
