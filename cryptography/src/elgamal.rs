// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! ElGamal cryptosystem, in its exponential (additively homomorphic) form.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::group::{Element, Scalar};
use crate::utils::Error;

/**
 * An `ElGamal` key pair.
 *
 * This struct represents a key pair in the `ElGamal` encryption scheme,
 * including the secret scalar value and public group element. Guardians
 * hold one each; only the public half is ever posted to the bulletin board.
 *
 * # Examples
 *
 * ```
 * use cryptography::elgamal::KeyPair;
 * use cryptography::group::Element;
 *
 * let keypair = KeyPair::generate(&mut rand::rngs::OsRng);
 * assert_eq!(keypair.pkey.y, Element::g_exp(&keypair.skey));
 * ```
 */
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPair {
    /// the private key as a raw group scalar
    pub skey: Scalar,
    /// the public key
    pub pkey: PublicKey,
}

impl KeyPair {
    /// Construct a key pair from an existing secret.
    #[must_use]
    pub fn new(skey: Scalar) -> Self {
        let pkey = PublicKey::new(Element::g_exp(&skey));
        KeyPair { skey, pkey }
    }

    /// Construct a new key pair, generating fresh key material.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::new(Scalar::random(rng))
    }
}

/**
 * An `ElGamal` public key.
 *
 * Serialized as the hex encoding of the group element `y`.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey {
    pub y: Element,
}

impl PublicKey {
    #[must_use]
    pub fn new(y: Element) -> Self {
        PublicKey { y }
    }
}

/// Combines guardian public keys into the joint election key.
///
/// The joint key is the group product of the individual keys, so its
/// secret is the sum of the guardians' secrets and no single guardian can
/// decrypt alone. The result does not depend on the iteration order.
///
/// # Errors
///
/// - `NoPublicKeys` if `keys` is empty
pub fn combine_public_keys<'a, I>(keys: I) -> Result<PublicKey, Error>
where
    I: IntoIterator<Item = &'a PublicKey>,
{
    let mut keys = keys.into_iter().peekable();
    if keys.peek().is_none() {
        return Err(Error::NoPublicKeys);
    }
    Ok(PublicKey::new(keys.map(|k| k.y).sum()))
}

/**
 * An exponential `ElGamal` ciphertext `(pad, data) = (g^r, g^m * y^r)`.
 *
 * Ciphertexts under the same key multiply componentwise into an encryption
 * of the sum of their plaintexts, which is what lets the tally accumulate
 * ballots without decrypting them.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub pad: Element,
    pub data: Element,
}

impl Ciphertext {
    /// The trivial encryption of zero, neutral for [`Ciphertext::add`].
    #[must_use]
    pub fn zero() -> Self {
        Ciphertext {
            pad: Element::one(),
            data: Element::one(),
        }
    }

    /// Encrypts `g^value` under `key` with randomness `r`.
    #[must_use]
    pub fn encrypt_exp(value: u64, r: &Scalar, key: &PublicKey) -> Self {
        Ciphertext {
            pad: Element::g_exp(r),
            data: Element::g_exp_u64(value).mul(&key.y.exp(r)),
        }
    }

    /// Homomorphic addition of plaintexts.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Ciphertext {
            pad: self.pad.mul(&other.pad),
            data: self.data.mul(&other.data),
        }
    }

    /// Decrypts with a single secret, returning `g^m`. Only meaningful when
    /// `skey` is the full secret of the encrypting key.
    #[must_use]
    pub fn decrypt_exp(&self, skey: &Scalar) -> Element {
        self.data.div(&self.pad.exp(skey))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_joint_key_secret_is_sum_of_secrets() {
        let guardians: Vec<KeyPair> = (0..4).map(|_| KeyPair::generate(&mut OsRng)).collect();
        let joint = combine_public_keys(guardians.iter().map(|g| &g.pkey)).unwrap();
        let secret: Scalar = guardians.iter().map(|g| g.skey).sum();
        assert_eq!(joint.y, Element::g_exp(&secret));

        let reversed = combine_public_keys(guardians.iter().rev().map(|g| &g.pkey)).unwrap();
        assert_eq!(joint, reversed);
    }

    #[test]
    fn test_combine_no_keys() {
        assert!(matches!(
            combine_public_keys(std::iter::empty()),
            Err(Error::NoPublicKeys)
        ));
    }

    #[test]
    fn test_homomorphic_addition() {
        let keypair = KeyPair::generate(&mut OsRng);
        let c1 = Ciphertext::encrypt_exp(3, &Scalar::random(&mut OsRng), &keypair.pkey);
        let c2 = Ciphertext::encrypt_exp(4, &Scalar::random(&mut OsRng), &keypair.pkey);

        let sum = c1.add(&c2).add(&Ciphertext::zero());
        assert_eq!(sum.decrypt_exp(&keypair.skey), Element::g_exp_u64(7));
    }
}
