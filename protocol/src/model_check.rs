// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Stateright model of the key ceremony phases under arbitrary delivery
//! order. The board is created and its key ceremony started; the remaining
//! messages (every guardian's election key, a repeated key, and messages
//! from later phases) may then arrive in any order, and each state of the
//! model is the board after delivering some sequence of them.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use stateright::{Checker, Model, Property};

    use crate::bulletin_board::top_level_actor::{BulletinBoard, Phase};
    use crate::config::ResubmissionPolicy;
    use crate::cryptography::RistrettoElectionGuard;
    use crate::messages::Message;
    use crate::test_support::*;

    const GUARDIANS: usize = 3;

    struct KeyCeremonyModel {
        prelude: Vec<Message>,
        pool: Vec<Message>,
        /// The guardian whose election key each pool entry carries, if any
        key_owners: Vec<Option<String>>,
    }

    #[derive(Clone, Debug, Hash, PartialEq, Eq)]
    struct CeremonyState {
        /// Indices into the pool, in delivery order
        delivered: Vec<usize>,
        phase: Phase,
        /// Whether no delivery so far moved the board to an earlier phase
        monotonic: bool,
    }

    impl KeyCeremonyModel {
        fn new() -> Self {
            let guardians = guardians(GUARDIANS);
            let prelude = vec![
                create_election(GUARDIANS, single_contest_manifest()),
                simple("start_key_ceremony"),
            ];
            let mut pool: Vec<Message> = guardians.iter().map(election_keys).collect();
            let mut key_owners: Vec<Option<String>> =
                guardians.iter().map(|g| Some(g.id.clone())).collect();
            pool.push(election_keys(&guardians[0]));
            key_owners.push(Some(guardians[0].id.clone()));
            pool.push(partial_keys(&guardians[1].id));
            key_owners.push(None);
            pool.push(simple("start_vote"));
            key_owners.push(None);
            KeyCeremonyModel {
                prelude,
                pool,
                key_owners,
            }
        }

        /// The number of distinct guardians whose keys are in `delivered`.
        fn key_owners_delivered(&self, delivered: &[usize]) -> usize {
            delivered
                .iter()
                .filter_map(|&i| self.key_owners[i].as_deref())
                .collect::<BTreeSet<_>>()
                .len()
        }

        fn replay(&self, delivered: &[usize]) -> BulletinBoard<RistrettoElectionGuard> {
            let mut board = new_board(ResubmissionPolicy::Overwrite);
            for message in &self.prelude {
                let _ = board.submit(message);
            }
            for &index in delivered {
                let _ = board.submit(&self.pool[index]);
            }
            board
        }
    }

    impl Model for KeyCeremonyModel {
        type State = CeremonyState;
        type Action = usize;

        fn init_states(&self) -> Vec<Self::State> {
            vec![CeremonyState {
                delivered: Vec::new(),
                phase: self.replay(&[]).phase(),
                monotonic: true,
            }]
        }

        fn actions(&self, state: &Self::State, actions: &mut Vec<Self::Action>) {
            actions.extend((0..self.pool.len()).filter(|i| !state.delivered.contains(i)));
        }

        fn next_state(&self, last_state: &Self::State, action: Self::Action) -> Option<Self::State> {
            let mut delivered = last_state.delivered.clone();
            delivered.push(action);
            let phase = self.replay(&delivered).phase();
            Some(CeremonyState {
                delivered,
                phase,
                monotonic: last_state.monotonic && phase >= last_state.phase,
            })
        }

        fn properties(&self) -> Vec<Property<Self>> {
            let never_regresses =
                Property::<Self>::always("phase never regresses", |_, state| state.monotonic);

            let quorum_needs_every_guardian =
                Property::<Self>::always("quorum needs every guardian", |model, state| {
                    let distinct = model.key_owners_delivered(&state.delivered);
                    state.phase < Phase::CollectPartialKeys || distinct == GUARDIANS
                });

            let stays_in_key_ceremony =
                Property::<Self>::always("premature messages are ignored", |_, state| {
                    state.phase <= Phase::CollectPartialKeys
                });

            let keys_collected = Property::<Self>::eventually("guardian keys collected", |_, state| {
                state.phase == Phase::CollectPartialKeys
            });

            vec![
                never_regresses,
                quorum_needs_every_guardian,
                stays_in_key_ceremony,
                keys_collected,
            ]
        }
    }

    #[test]
    fn test_repeated_key_counts_for_its_guardian() {
        let model = KeyCeremonyModel::new();

        // Guardian 0's key arrives twice; guardians 1 and 2 once each.
        assert_eq!(model.key_owners_delivered(&[1, 2, 3]), GUARDIANS);
        assert_eq!(model.replay(&[1, 2, 3]).phase(), Phase::CollectPartialKeys);

        assert_eq!(model.key_owners_delivered(&[0, 3, 4]), 1);
        assert_eq!(model.replay(&[0, 3, 4]).phase(), Phase::CollectGuardianKeys);
    }

    #[test]
    fn check_key_ceremony() {
        let checker = KeyCeremonyModel::new().checker().spawn_bfs().join();
        checker.assert_properties();
    }
}
