//! Starting content for the sample gallery: five cards with their opening
//! tallies and a short comment thread.

use chrono::{Duration, Utc};
use comment_board::CommentBoard;
use shared::{
    domain::{
        CardId, CardSpec, CardVariant, Comment, CommentId, PostCategory, PostId, Reaction,
        VoteOption,
    },
    error::EngineError,
};
use vote_ledger::VoteLedger;

use crate::{GallerySession, SessionOptions};

fn photo(id: &str) -> String {
    format!("https://images.pexels.com/photos/{id}/pexels-photo-{id}.jpeg?auto=compress&cs=tinysrgb&w=150")
}

pub fn demo_cards() -> Vec<CardSpec> {
    vec![
        CardSpec {
            card_id: CardId::from("traditional"),
            variant: CardVariant::Traditional,
            title: "What do you think about the new traffic rules?".into(),
            options: vec![
                VoteOption::new(Reaction::Gajjab.as_str(), 45).with_emoji("🙌"),
                VoteOption::new(Reaction::YestoNiHunxa.as_str(), 23).with_emoji("😐"),
                VoteOption::new(Reaction::Bekar.as_str(), 12).with_emoji("👎"),
            ],
        },
        CardSpec {
            card_id: CardId::from("faceoff"),
            variant: CardVariant::FaceOff,
            title: "Who would make a better mayor?".into(),
            options: vec![
                VoteOption::new("1", 156)
                    .with_label("Candidate A")
                    .with_label_nepali("उम्मेदवार क")
                    .with_image_url(photo("2379004")),
                VoteOption::new("2", 134)
                    .with_label("Candidate B")
                    .with_label_nepali("उम्मेदवार ख")
                    .with_image_url(photo("1222271")),
            ],
        },
        CardSpec {
            card_id: CardId::from("multichoice"),
            variant: CardVariant::MultiChoice,
            title: "Best Nepali food?".into(),
            options: vec![
                VoteOption::new("1", 89)
                    .with_label("Dal Bhat")
                    .with_label_nepali("दाल भात")
                    .with_image_url(photo("1640777")),
                VoteOption::new("2", 123)
                    .with_label("Momo")
                    .with_label_nepali("मोमो")
                    .with_image_url(photo("4449130")),
                VoteOption::new("3", 67)
                    .with_label("Choila")
                    .with_label_nepali("छोइला")
                    .with_image_url(photo("5474640")),
                VoteOption::new("4", 45)
                    .with_label("Sel Roti")
                    .with_label_nepali("सेल रोटी")
                    .with_image_url(photo("4577179")),
            ],
        },
        CardSpec {
            card_id: CardId::from("yesno"),
            variant: CardVariant::YesNo,
            title: "Infrastructure Development".into(),
            options: vec![VoteOption::new("yes", 67), VoteOption::new("no", 45)],
        },
        CardSpec {
            card_id: CardId::from("quickpoll"),
            variant: CardVariant::QuickPoll,
            title: "How are you feeling today?".into(),
            options: vec![
                VoteOption::new("1", 34)
                    .with_emoji("😊")
                    .with_label("Happy")
                    .with_label_nepali("खुसी"),
                VoteOption::new("2", 23)
                    .with_emoji("😐")
                    .with_label("Neutral")
                    .with_label_nepali("सामान्य"),
                VoteOption::new("3", 12)
                    .with_emoji("😔")
                    .with_label("Sad")
                    .with_label_nepali("दुखी"),
                VoteOption::new("4", 18)
                    .with_emoji("😴")
                    .with_label("Tired")
                    .with_label_nepali("थकित"),
                VoteOption::new("5", 8)
                    .with_emoji("🤔")
                    .with_label("Confused")
                    .with_label_nepali("भ्रमित"),
            ],
        },
    ]
}

pub fn demo_comments(post_id: &PostId) -> Vec<Comment> {
    let now = Utc::now();
    vec![
        Comment {
            comment_id: CommentId::from("1"),
            post_id: post_id.clone(),
            text: "This is a great initiative for Nepal!".into(),
            author: "Anonymous_User_1".into(),
            created_at: now,
            votes: 12,
            reaction: Some(Reaction::Gajjab),
        },
        Comment {
            comment_id: CommentId::from("2"),
            post_id: post_id.clone(),
            text: "यो राम्रो योजना हो तर कार्यान्वयन महत्वपूर्ण छ।".into(),
            author: "Anonymous_User_2".into(),
            created_at: now - Duration::hours(1),
            votes: 8,
            reaction: Some(Reaction::YestoNiHunxa),
        },
    ]
}

pub fn demo_session(
    options: SessionOptions,
    post_id: &PostId,
    category: PostCategory,
) -> Result<GallerySession, EngineError> {
    let ledger = VoteLedger::with_cards(demo_cards())?;
    let mut board = CommentBoard::new();
    board.seed_comments(post_id, category, demo_comments(post_id))?;
    Ok(GallerySession::new(ledger, board, options))
}

/// Same cards with every tally at zero and an empty comment thread.
pub fn fresh_session(
    options: SessionOptions,
    post_id: &PostId,
    category: PostCategory,
) -> Result<GallerySession, EngineError> {
    let cards = demo_cards().into_iter().map(|mut card| {
        for option in &mut card.options {
            option.votes = 0;
        }
        card
    });
    let ledger = VoteLedger::with_cards(cards)?;
    let mut board = CommentBoard::new();
    board.open_post(post_id, category);
    Ok(GallerySession::new(ledger, board, options))
}
