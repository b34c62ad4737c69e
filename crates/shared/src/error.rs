use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{CardId, CommentId, OptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Conflict,
    Validation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Card,
    Comment,
    Post,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Card => "card",
            Self::Comment => "comment",
            Self::Post => "post",
        })
    }
}

/// Every failure the voting and comment engine can report. All of them leave
/// state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("card {card_id} already has a recorded vote")]
    AlreadyVoted { card_id: CardId },
    #[error("option {option_id} is not part of card {card_id}")]
    InvalidOption { card_id: CardId, option_id: OptionId },
    #[error("comment text is empty")]
    EmptyComment,
    #[error("comment has {word_count} words, limit is {limit}")]
    WordLimitExceeded { word_count: usize, limit: usize },
    #[error("unknown {kind} '{id}'")]
    UnknownEntity { kind: EntityKind, id: String },
    #[error("comment id {comment_id} is already in use")]
    DuplicateComment { comment_id: CommentId },
    #[error("invalid card {card_id}: {reason}")]
    InvalidCard { card_id: CardId, reason: String },
    #[error("vote counter of {kind} '{id}' cannot grow any further")]
    CounterSaturated { kind: EntityKind, id: String },
}

impl EngineError {
    pub fn unknown(kind: EntityKind, id: impl std::fmt::Display) -> Self {
        Self::UnknownEntity {
            kind,
            id: id.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyVoted { .. }
            | Self::DuplicateComment { .. }
            | Self::CounterSaturated { .. } => ErrorCode::Conflict,
            Self::UnknownEntity { .. } => ErrorCode::NotFound,
            Self::InvalidOption { .. }
            | Self::EmptyComment
            | Self::WordLimitExceeded { .. }
            | Self::InvalidCard { .. } => ErrorCode::Validation,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(value: EngineError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_engine_errors_to_api_codes() {
        let err: ApiError = EngineError::AlreadyVoted {
            card_id: CardId::from("yesno"),
        }
        .into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "card yesno already has a recorded vote");

        let err: ApiError = EngineError::unknown(EntityKind::Comment, "c-9").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "unknown comment 'c-9'");

        let err: ApiError = EngineError::WordLimitExceeded {
            word_count: 21,
            limit: 20,
        }
        .into();
        assert_eq!(err.code, ErrorCode::Validation);

        let err: ApiError = EngineError::CounterSaturated {
            kind: EntityKind::Card,
            id: "yesno".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "vote counter of card 'yesno' cannot grow any further");
    }
}
