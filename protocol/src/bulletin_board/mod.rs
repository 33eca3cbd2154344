// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! This module contains the implementation of the bulletin board.

pub(crate) mod handlers;
pub mod top_level_actor;

pub mod context;
