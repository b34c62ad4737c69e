use serde::{Deserialize, Serialize};

use crate::{
    domain::{CardId, CardVariant, Comment, CommentId, OptionId, PostCategory, PostId, Reaction},
    error::ApiError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientRequest {
    CastVote {
        card_id: CardId,
        option_id: OptionId,
    },
    GetResults {
        card_id: CardId,
    },
    IsVoted {
        card_id: CardId,
    },
    UnmountCard {
        card_id: CardId,
    },
    MountCard {
        card_id: CardId,
    },
    CheckDraft {
        category: PostCategory,
        text: String,
    },
    SubmitComment {
        post_id: PostId,
        text: String,
        category: PostCategory,
    },
    ReactToComment {
        comment_id: CommentId,
        reaction: Reaction,
    },
    ListComments {
        post_id: PostId,
    },
    GallerySummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResult {
    pub card_id: CardId,
    pub option_id: OptionId,
    pub option_votes: u64,
    pub total_votes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionResult {
    pub option_id: OptionId,
    pub votes: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardResults {
    pub card_id: CardId,
    pub variant: CardVariant,
    pub total_votes: u64,
    pub options: Vec<OptionResult>,
}

impl CardResults {
    pub fn option(&self, option_id: &OptionId) -> Option<&OptionResult> {
        self.options.iter().find(|o| &o.option_id == option_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftCheck {
    pub word_count: usize,
    pub accepted: bool,
    /// Fewer than five words left (or already over the limit).
    pub remaining_warning: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSummary {
    pub card_id: CardId,
    pub variant: CardVariant,
    pub title: String,
    pub total_votes: u64,
    pub voted: bool,
    /// The option the participant picked, for highlighting.
    pub user_choice: Option<OptionId>,
    pub revealed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub post_id: PostId,
    pub category: PostCategory,
    pub comment_count: usize,
    pub engagement: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GallerySummary {
    pub cards: Vec<CardSummary>,
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GalleryEvent {
    VoteRecorded {
        vote: VoteResult,
    },
    CardRevealed {
        results: CardResults,
    },
    Results {
        results: CardResults,
        revealed: bool,
        user_choice: Option<OptionId>,
    },
    VoteStatus {
        card_id: CardId,
        voted: bool,
        user_choice: Option<OptionId>,
    },
    RevealCancelled {
        card_id: CardId,
    },
    CardUnmounted {
        card_id: CardId,
        reveal_cancelled: bool,
    },
    CardMounted {
        card_id: CardId,
        results: Option<CardResults>,
    },
    DraftChecked {
        check: DraftCheck,
        limit: usize,
    },
    CommentAdded {
        comment: Comment,
    },
    CommentReacted {
        comment: Comment,
    },
    Comments {
        post_id: PostId,
        comments: Vec<Comment>,
    },
    Summary {
        summary: GallerySummary,
    },
    Error(ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_request_uses_tagged_snake_case_encoding() {
        let raw = r#"{"type":"react_to_comment","payload":{"comment_id":"cmt-00000001","reaction":"yesto-ni-hunxa"}}"#;
        let request: ClientRequest = serde_json::from_str(raw).expect("decode");
        match request {
            ClientRequest::ReactToComment {
                comment_id,
                reaction,
            } => {
                assert_eq!(comment_id, CommentId::from("cmt-00000001"));
                assert_eq!(reaction, Reaction::YestoNiHunxa);
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn unit_request_has_no_payload() {
        let encoded = serde_json::to_value(ClientRequest::GallerySummary).expect("encode");
        assert_eq!(encoded["type"], "gallery_summary");
    }

    #[test]
    fn variant_names_match_card_kinds() {
        let encoded = serde_json::to_value(CardVariant::FaceOff).expect("encode");
        assert_eq!(encoded, "faceoff");
        let decoded: CardVariant = serde_json::from_str("\"yesno\"").expect("decode");
        assert_eq!(decoded, CardVariant::YesNo);
    }
}
