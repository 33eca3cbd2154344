// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Utilities: the library error type and serde support for group values.

pub mod error;
pub mod serialization;

pub use error::Error;
