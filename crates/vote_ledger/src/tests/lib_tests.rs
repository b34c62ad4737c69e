use super::*;

fn yes_no(yes: u64, no: u64) -> CardSpec {
    CardSpec {
        card_id: CardId::from("yesno"),
        variant: CardVariant::YesNo,
        title: "Infrastructure Development".into(),
        options: vec![VoteOption::new("yes", yes), VoteOption::new("no", no)],
    }
}

fn traditional() -> CardSpec {
    CardSpec {
        card_id: CardId::from("traditional"),
        variant: CardVariant::Traditional,
        title: "What do you think about the new traffic rules?".into(),
        options: vec![
            VoteOption::new("gajjab", 45),
            VoteOption::new("yesto-ni-hunxa", 23),
            VoteOption::new("bekar", 12),
        ],
    }
}

fn faceoff() -> CardSpec {
    CardSpec {
        card_id: CardId::from("faceoff"),
        variant: CardVariant::FaceOff,
        title: "Who would make a better mayor?".into(),
        options: vec![
            VoteOption::new("1", 0).with_label("Candidate A"),
            VoteOption::new("2", 0).with_label("Candidate B"),
        ],
    }
}

#[test]
fn yes_no_scenario_from_zero() {
    let mut ledger = VoteLedger::with_cards([yes_no(0, 0)]).expect("ledger");
    let card = CardId::from("yesno");

    let vote = ledger
        .cast_vote(&card, &OptionId::from("yes"))
        .expect("vote");
    assert_eq!(vote.option_votes, 1);
    assert_eq!(vote.total_votes, 1);

    let results = ledger.compute_results(&card).expect("results");
    let yes = results.option(&OptionId::from("yes")).expect("yes");
    let no = results.option(&OptionId::from("no")).expect("no");
    assert_eq!((yes.votes, yes.percentage), (1, 100.0));
    assert_eq!((no.votes, no.percentage), (0, 0.0));
    assert!(ledger.is_voted(&card).expect("voted"));
}

#[test]
fn cast_vote_adds_exactly_one() {
    let mut ledger = VoteLedger::with_cards([traditional()]).expect("ledger");
    let card = CardId::from("traditional");
    let before = ledger.compute_results(&card).expect("results");

    ledger
        .cast_vote(&card, &OptionId::from("bekar"))
        .expect("vote");

    let after = ledger.compute_results(&card).expect("results");
    assert_eq!(after.total_votes, before.total_votes + 1);
    for (old, new) in before.options.iter().zip(after.options.iter()) {
        let expected = if old.option_id.as_str() == "bekar" {
            old.votes + 1
        } else {
            old.votes
        };
        assert_eq!(new.votes, expected, "option {}", old.option_id);
    }
    assert_eq!(
        ledger.user_choice(&card).expect("choice"),
        Some(&OptionId::from("bekar"))
    );
}

#[test]
fn second_vote_is_rejected_and_tallies_stay() {
    let mut ledger = VoteLedger::with_cards([yes_no(67, 45)]).expect("ledger");
    let card = CardId::from("yesno");
    ledger
        .cast_vote(&card, &OptionId::from("no"))
        .expect("first vote");
    let snapshot = ledger.compute_results(&card).expect("results");

    let err = ledger
        .cast_vote(&card, &OptionId::from("yes"))
        .expect_err("should fail");
    assert_eq!(
        err,
        EngineError::AlreadyVoted {
            card_id: card.clone()
        }
    );
    assert_eq!(ledger.compute_results(&card).expect("results"), snapshot);
    assert_eq!(
        ledger.user_choice(&card).expect("choice"),
        Some(&OptionId::from("no"))
    );

    let err = ledger
        .cast_vote(&card, &OptionId::from("no"))
        .expect_err("same option again");
    assert!(matches!(err, EngineError::AlreadyVoted { .. }));
}

#[test]
fn unknown_option_leaves_card_unvoted() {
    let mut ledger = VoteLedger::with_cards([yes_no(1, 1)]).expect("ledger");
    let card = CardId::from("yesno");
    let err = ledger
        .cast_vote(&card, &OptionId::from("maybe"))
        .expect_err("should fail");
    assert!(matches!(err, EngineError::InvalidOption { .. }));
    assert!(!ledger.is_voted(&card).expect("voted"));
    assert_eq!(ledger.compute_results(&card).expect("results").total_votes, 2);

    ledger
        .cast_vote(&card, &OptionId::from("yes"))
        .expect("valid vote still allowed");
}

#[test]
fn unknown_card_is_reported() {
    let mut ledger = VoteLedger::new();
    let card = CardId::from("missing");
    assert!(matches!(
        ledger.cast_vote(&card, &OptionId::from("yes")),
        Err(EngineError::UnknownEntity {
            kind: EntityKind::Card,
            ..
        })
    ));
    assert!(ledger.compute_results(&card).is_err());
    assert!(ledger.is_voted(&card).is_err());
}

#[test]
fn fresh_faceoff_reads_even_split() {
    let ledger = VoteLedger::with_cards([faceoff()]).expect("ledger");
    let results = ledger
        .compute_results(&CardId::from("faceoff"))
        .expect("results");
    assert_eq!(results.total_votes, 0);
    assert!(results.options.iter().all(|o| o.percentage == 50.0));
}

#[test]
fn results_stay_hidden_until_revealed() {
    let mut ledger = VoteLedger::with_cards([yes_no(0, 0)]).expect("ledger");
    let card = CardId::from("yesno");

    assert!(!ledger.reveal(&card).expect("reveal"), "unvoted card stays hidden");
    assert_eq!(ledger.visible_results(&card).expect("visible"), None);

    ledger
        .cast_vote(&card, &OptionId::from("yes"))
        .expect("vote");
    assert_eq!(ledger.visible_results(&card).expect("visible"), None);

    assert!(ledger.reveal(&card).expect("reveal"));
    assert!(!ledger.reveal(&card).expect("second reveal is a no-op"));
    let visible = ledger
        .visible_results(&card)
        .expect("visible")
        .expect("revealed results");
    assert_eq!(visible.total_votes, 1);
}

#[test]
fn rejects_malformed_cards() {
    let mut ledger = VoteLedger::new();

    let mut three_way_faceoff = faceoff();
    three_way_faceoff.options.push(VoteOption::new("3", 0));
    assert!(matches!(
        ledger.register_card(three_way_faceoff),
        Err(EngineError::InvalidCard { .. })
    ));

    let mut wrong_sentiments = traditional();
    wrong_sentiments.options[2] = VoteOption::new("meh", 0);
    assert!(ledger.register_card(wrong_sentiments).is_err());

    let duplicate_options = CardSpec {
        card_id: CardId::from("quickpoll"),
        variant: CardVariant::QuickPoll,
        title: "How are you feeling today?".into(),
        options: vec![VoteOption::new("1", 0), VoteOption::new("1", 3)],
    };
    assert!(ledger.register_card(duplicate_options).is_err());

    ledger.register_card(yes_no(0, 0)).expect("first");
    assert!(matches!(
        ledger.register_card(yes_no(5, 5)),
        Err(EngineError::InvalidCard { .. })
    ));
    assert_eq!(ledger.cards().len(), 1);
}

#[test]
fn cards_keep_registration_order() {
    let ledger = VoteLedger::with_cards([traditional(), faceoff(), yes_no(0, 0)]).expect("ledger");
    let ids: Vec<_> = ledger.cards().iter().map(|c| c.card_id.as_str()).collect();
    assert_eq!(ids, ["traditional", "faceoff", "yesno"]);
}

#[test]
fn overflowing_tally_snapshot_is_rejected() {
    let mut ledger = VoteLedger::new();
    assert!(matches!(
        ledger.register_card(yes_no(u64::MAX, 1)),
        Err(EngineError::InvalidCard { .. })
    ));
    assert!(ledger.cards().is_empty());
}

#[test]
fn vote_on_saturated_card_fails_without_changes() {
    let mut ledger = VoteLedger::with_cards([yes_no(u64::MAX, 0)]).expect("ledger");
    let card = CardId::from("yesno");
    let before = ledger.compute_results(&card).expect("results");

    for option in ["yes", "no"] {
        let err = ledger
            .cast_vote(&card, &OptionId::from(option))
            .expect_err("saturated");
        assert!(matches!(
            err,
            EngineError::CounterSaturated {
                kind: EntityKind::Card,
                ..
            }
        ));
    }
    assert!(!ledger.is_voted(&card).expect("voted"));
    assert_eq!(ledger.compute_results(&card).expect("results"), before);
}
