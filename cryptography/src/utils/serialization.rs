// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Serde implementations for group values.
//!
//! Elements and scalars are serialized as lowercase hex strings of their
//! 32-byte encodings, so every structure built from them has a readable JSON
//! form on the bulletin board.

use crate::group::{Element, Scalar};
use serde::{self, de::Error, Deserializer, Serializer};

/// Implement hex string serde serialization for a type with
/// `to_bytes` and `from_bytes`.
macro_rules! implement_serde_hex {
    ($type:ty) => {
        impl<'de> serde::Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let encoded: String = serde::Deserialize::deserialize(deserializer)?;
                let bytes = hex::decode(&encoded).map_err(D::Error::custom)?;
                <$type>::from_bytes(&bytes).map_err(D::Error::custom)
            }
        }

        impl serde::Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&hex::encode(self.to_bytes()))
            }
        }
    };
}

implement_serde_hex!(Element);
implement_serde_hex!(Scalar);
