// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Basic end-to-end tests of the bulletin board. These test that an
//! election runs from `create_election` to `end_tally` with real
//! guardian keys, ballots and decryption shares when messages arrive in
//! order. Delivery orders are explored by the Stateright model checker
//! elsewhere.

#[cfg(test)]
mod tests {
    use crate::bulletin_board::top_level_actor::{BulletinBoard, Phase};
    use crate::config::ResubmissionPolicy;
    use crate::cryptography::RistrettoElectionGuard;
    use crate::error::Error;
    use crate::test_support::*;
    use cryptography::ballot::CiphertextBallot;
    use cryptography::election::{
        ContestDescription, ElectionParameters, Manifest, SelectionDescription,
    };
    use cryptography::group::Scalar;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    type Board = BulletinBoard<RistrettoElectionGuard>;

    /// Runs an election through voting: the key ceremony, one `vote.cast`
    /// and one ingestion per ballot, `end_vote` and `start_tally`.
    fn run_until_tally<F>(guardians: &[Guardian], manifest: Manifest, ballots: F) -> (Board, ElectionParameters)
    where
        F: FnOnce(&ElectionParameters) -> Vec<CiphertextBallot>,
    {
        let mut board = new_board(ResubmissionPolicy::Overwrite);
        run_key_ceremony(&mut board, guardians, manifest);
        board.submit(&simple("start_vote")).unwrap();
        let parameters = board.election_parameters().unwrap().clone();

        for ballot in ballots(&parameters) {
            assert!(board.submit(&vote_cast(&ballot)).unwrap().is_none());
            board.ballot_box().add_ballot(&ballot).unwrap();
        }
        board.submit(&simple("end_vote")).unwrap();
        board.submit(&simple("start_tally")).unwrap();
        assert_eq!(board.phase(), Phase::CollectShares);

        (board, parameters)
    }

    fn one_selection_manifest() -> Manifest {
        Manifest {
            election_scope_id: "recall-2025".to_string(),
            contests: vec![ContestDescription {
                object_id: "recall".to_string(),
                votes_allowed: 1,
                selections: vec![SelectionDescription {
                    object_id: "yes".to_string(),
                }],
            }],
        }
    }

    #[test]
    fn test_key_ceremony_then_voting_opens() {
        let guardians = guardians(3);
        let mut board = new_board(ResubmissionPolicy::Overwrite);

        let outbound = run_key_ceremony(&mut board, &guardians, two_contest_manifest());
        assert_eq!(outbound.message_type, "end_key_ceremony");
        assert!(outbound.results.is_none());
        assert_eq!(board.phase(), Phase::StartVote);

        assert!(board.submit(&simple("start_vote")).unwrap().is_none());
        assert_eq!(board.phase(), Phase::CastVote);
        assert!(board.ballot_box().is_open());
    }

    #[test]
    fn test_forged_ballot_is_rejected_without_tally_change() {
        let guardians = guardians(3);
        let mut board = new_board(ResubmissionPolicy::Overwrite);
        run_key_ceremony(&mut board, &guardians, two_contest_manifest());
        board.submit(&simple("start_vote")).unwrap();
        let parameters = board.election_parameters().unwrap().clone();

        let honest = ballot_with(&parameters, "b1", &[("mayor", &["alice"][..])]);
        board.submit(&vote_cast(&honest)).unwrap();
        board.ballot_box().add_ballot(&honest).unwrap();
        let before = serde_json::to_string(&board.get_tally_cast().unwrap()).unwrap();

        let mut forged = ballot_with(&parameters, "b2", &[("mayor", &["bob"][..])]);
        forged.contests[0].selections[1].proof.branches[0].response =
            Scalar::random(&mut rand::rngs::OsRng);
        match board.submit(&vote_cast(&forged)) {
            Err(Error::InvalidBallot { ballot_id }) => assert_eq!(ballot_id, "b2"),
            other => panic!("unexpected {other:?}"),
        }

        let after = serde_json::to_string(&board.get_tally_cast().unwrap()).unwrap();
        assert_eq!(before, after);
        assert_eq!(board.phase(), Phase::CastVote);
    }

    #[test]
    fn test_single_selection_election() {
        let guardians = guardians(3);
        let (mut board, parameters) = run_until_tally(&guardians, one_selection_manifest(), |p| {
            vec![
                ballot_with(p, "b1", &[("recall", &["yes"][..])]),
                ballot_with(p, "b2", &[]),
            ]
        });
        let tally = tally_cast(&board);

        let mut emitted = Vec::new();
        for guardian in &guardians {
            emitted.extend(board.submit(&trustee_share(guardian, &tally, &parameters)).unwrap());
        }
        assert_eq!(emitted.len(), 1);
        let end_tally = &emitted[0];
        assert_eq!(end_tally.message_type, "end_tally");
        assert!(end_tally.content.is_none());

        let results = end_tally.results.as_ref().unwrap();
        assert_eq!(results["recall"]["object_id"], json!("recall"));
        assert_eq!(results["recall"]["selections"]["yes"]["tally"], json!(1));

        // Terminal: later shares do nothing.
        assert!(board
            .submit(&trustee_share(&guardians[0], &tally, &parameters))
            .unwrap()
            .is_none());
        assert_eq!(board.phase(), Phase::CollectShares);
    }

    #[test]
    fn test_two_contest_election_counts() {
        let guardians = guardians(3);
        let (mut board, parameters) = run_until_tally(&guardians, two_contest_manifest(), |p| {
            vec![
                ballot_with(p, "b1", &[("mayor", &["alice"][..]), ("council", &["carol", "dave"][..])]),
                ballot_with(p, "b2", &[("mayor", &["bob"][..]), ("council", &["carol"][..])]),
                ballot_with(p, "b3", &[("mayor", &["alice"][..]), ("council", &["dave", "erin"][..])]),
                ballot_with(p, "b4", &[("council", &["carol"][..])]),
            ]
        });
        let tally = tally_cast(&board);
        assert_eq!(tally.cast_ballot_ids.len(), 4);

        let mut results = None;
        for guardian in guardians.iter().rev() {
            assert!(results.is_none());
            results = board
                .submit(&trustee_share(guardian, &tally, &parameters))
                .unwrap()
                .and_then(|o| o.results);
        }
        let results = results.unwrap();

        let count = |contest: &str, selection: &str| results[contest]["selections"][selection]["tally"].clone();
        assert_eq!(count("mayor", "alice"), json!(2));
        assert_eq!(count("mayor", "bob"), json!(1));
        assert_eq!(count("council", "carol"), json!(3));
        assert_eq!(count("council", "dave"), json!(2));
        assert_eq!(count("council", "erin"), json!(1));
    }

    #[test]
    fn test_incomplete_share_bundle_can_be_resubmitted() {
        let guardians = guardians(2);
        let (mut board, parameters) =
            run_until_tally(&guardians, single_contest_manifest(), |p| vec![ballot(p, "b1", "no")]);
        let tally = tally_cast(&board);

        board.submit(&trustee_share(&guardians[0], &tally, &parameters)).unwrap();
        let mut incomplete = trustee_share(&guardians[1], &tally, &parameters);
        if let Value::Object(selections) = &mut incomplete.content["contests"]["question-1"]["selections"] {
            selections.remove("yes");
        }
        match board.submit(&incomplete) {
            Err(Error::MissingShare {
                guardian_id,
                selection_id,
                ..
            }) => {
                assert_eq!(guardian_id, "guardian-1");
                assert_eq!(selection_id, "yes");
            }
            other => panic!("unexpected {other:?}"),
        }

        // A share computed with the wrong secret fails its proof.
        let impostor = Guardian {
            id: guardians[1].id.clone(),
            keypair: Guardian::new(9).keypair,
        };
        assert!(matches!(
            board.submit(&trustee_share(&impostor, &tally, &parameters)),
            Err(Error::Cryptography(_))
        ));

        let outbound = board
            .submit(&trustee_share(&guardians[1], &tally, &parameters))
            .unwrap()
            .unwrap();
        let results = outbound.results.unwrap();
        assert_eq!(results["question-1"]["selections"]["no"]["tally"], json!(1));
        assert_eq!(results["question-1"]["selections"]["yes"]["tally"], json!(0));
    }

    #[test]
    fn test_ballots_ingested_after_end_vote_are_tallied() {
        let guardians = guardians(2);
        let mut board = new_board(ResubmissionPolicy::Overwrite);
        run_key_ceremony(&mut board, &guardians, single_contest_manifest());
        board.submit(&simple("start_vote")).unwrap();
        let parameters = board.election_parameters().unwrap().clone();

        let early = ballot(&parameters, "b1", "yes");
        board.submit(&vote_cast(&early)).unwrap();
        board.ballot_box().add_ballot(&early).unwrap();
        board.submit(&simple("end_vote")).unwrap();
        assert_eq!(board.phase(), Phase::StartTally);

        // `vote.cast` is over, but the ballot box is still open.
        let late = ballot(&parameters, "b2", "no");
        assert!(board.submit(&vote_cast(&late)).unwrap().is_none());
        board.ballot_box().add_ballot(&late).unwrap();

        board.submit(&simple("start_tally")).unwrap();
        let tally = tally_cast(&board);
        assert_eq!(tally.cast_ballot_ids.len(), 2);
        assert!(matches!(
            board.ballot_box().add_ballot(&ballot(&parameters, "b3", "no")),
            Err(Error::BallotBoxClosed)
        ));

        let mut emitted = Vec::new();
        for guardian in &guardians {
            emitted.extend(board.submit(&trustee_share(guardian, &tally, &parameters)).unwrap());
        }
        let results = emitted[0].results.clone().unwrap();
        assert_eq!(results["question-1"]["selections"]["yes"]["tally"], json!(1));
        assert_eq!(results["question-1"]["selections"]["no"]["tally"], json!(1));
    }

    #[test]
    fn test_shares_from_outside_the_key_ceremony_are_refused() {
        let guardians = guardians(2);
        let (mut board, parameters) =
            run_until_tally(&guardians, single_contest_manifest(), |p| vec![ballot(p, "b1", "yes")]);
        let tally = tally_cast(&board);

        let outsider = Guardian {
            id: "guardian-99".to_string(),
            keypair: Guardian::new(99).keypair,
        };
        match board.submit(&trustee_share(&outsider, &tally, &parameters)) {
            Err(Error::UnknownGuardian { guardian_id }) => assert_eq!(guardian_id, "guardian-99"),
            other => panic!("unexpected {other:?}"),
        }

        // The refused bundle neither counts towards quorum nor blocks the
        // guardians' own shares.
        assert!(board
            .submit(&trustee_share(&guardians[0], &tally, &parameters))
            .unwrap()
            .is_none());
        let outbound = board
            .submit(&trustee_share(&guardians[1], &tally, &parameters))
            .unwrap()
            .unwrap();
        let results = outbound.results.unwrap();
        assert_eq!(results["question-1"]["selections"]["yes"]["tally"], json!(1));
        assert_eq!(results["question-1"]["selections"]["no"]["tally"], json!(0));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(6))]

        #[test]
        fn prop_share_order_does_not_change_results(order in Just(vec![0usize, 1, 2]).prop_shuffle()) {
            let guardians = guardians(3);
            let (mut board, parameters) = run_until_tally(&guardians, single_contest_manifest(), |p| {
                vec![ballot(p, "b1", "yes"), ballot(p, "b2", "yes"), ballot(p, "b3", "no")]
            });
            let tally = tally_cast(&board);

            let mut emitted = Vec::new();
            for &i in &order {
                emitted.extend(board.submit(&trustee_share(&guardians[i], &tally, &parameters)).unwrap());
            }
            prop_assert_eq!(emitted.len(), 1);
            let results = emitted[0].results.clone().unwrap();
            prop_assert_eq!(&results["question-1"]["selections"]["yes"]["tally"], &json!(2));
            prop_assert_eq!(&results["question-1"]["selections"]["no"]["tally"], &json!(1));
        }
    }
}
