// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! A message-driven election bulletin board.
//!
//! The board runs an election through its phases (key ceremony, voting,
//! tallying) driven entirely by inbound messages. Each key ceremony and
//! tally phase completes once every guardian has contributed, and a board
//! never returns to an earlier phase. Cryptographic work is delegated to an
//! [`ElectionCryptography`] implementation; [`RistrettoElectionGuard`] is
//! the one shipped with the board.
//!
//! # Examples
//!
//! ```
//! use tallyboard::{BoardConfig, BulletinBoard, Phase, RistrettoElectionGuard};
//!
//! let mut board = BulletinBoard::new(RistrettoElectionGuard::default(), BoardConfig::default());
//! let manifest = r#"{"election_scope_id": "referendum", "contests": [
//!     {"object_id": "question-1", "selections": [{"object_id": "yes"}, {"object_id": "no"}]}
//! ]}"#;
//! let create = format!(
//!     r#"{{"message_type": "create_election", "content": {{"number_of_guardians": 2, "manifest": {manifest}}}}}"#
//! );
//!
//! // Not yet: the election does not exist.
//! assert!(board.submit_json(r#"{"message_type": "start_key_ceremony"}"#).unwrap().is_none());
//! board.submit_json(&create).unwrap();
//! board.submit_json(r#"{"message_type": "start_key_ceremony"}"#).unwrap();
//! assert_eq!(board.phase(), Phase::CollectGuardianKeys);
//! ```

pub mod ballot_box;
pub mod bulletin_board;
pub mod config;
pub mod cryptography;
pub mod error;
pub mod messages;

#[cfg(test)]
mod integration_tests_basic;

#[cfg(test)]
mod model_check;

#[cfg(test)]
mod test_support;

pub use ballot_box::{BallotBox, IngestReport};
pub use bulletin_board::top_level_actor::{BulletinBoard, Phase};
pub use config::{BoardConfig, Config, CryptographyConfig, ResubmissionPolicy};
pub use cryptography::{ElectionCryptography, RistrettoElectionGuard};
pub use error::Error;
pub use messages::{Message, MessageType, OutboundMessage};
