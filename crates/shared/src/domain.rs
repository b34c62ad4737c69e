use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(CardId);
id_newtype!(OptionId);
id_newtype!(CommentId);
id_newtype!(PostId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardVariant {
    Traditional,
    #[serde(rename = "faceoff")]
    FaceOff,
    #[serde(rename = "multichoice")]
    MultiChoice,
    #[serde(rename = "yesno")]
    YesNo,
    #[serde(rename = "quickpoll")]
    QuickPoll,
}

impl CardVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Traditional => "traditional",
            Self::FaceOff => "faceoff",
            Self::MultiChoice => "multichoice",
            Self::YesNo => "yesno",
            Self::QuickPoll => "quickpoll",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PostCategory {
    #[default]
    Daily,
    Politician,
    Community,
    Sports,
    Entertainment,
}

impl PostCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Politician => "politician",
            Self::Community => "community",
            Self::Sports => "sports",
            Self::Entertainment => "entertainment",
        }
    }
}

impl FromStr for PostCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "politician" => Ok(Self::Politician),
            "community" => Ok(Self::Community),
            "sports" => Ok(Self::Sports),
            "entertainment" => Ok(Self::Entertainment),
            other => Err(format!("unknown post category '{other}'")),
        }
    }
}

/// Sentiment used both as a comment reaction and as the option set of a
/// traditional card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reaction {
    #[serde(rename = "gajjab")]
    Gajjab,
    #[serde(rename = "yesto-ni-hunxa")]
    YestoNiHunxa,
    #[serde(rename = "bekar")]
    Bekar,
}

impl Reaction {
    pub const ALL: [Reaction; 3] = [Reaction::Gajjab, Reaction::YestoNiHunxa, Reaction::Bekar];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gajjab => "gajjab",
            Self::YestoNiHunxa => "yesto-ni-hunxa",
            Self::Bekar => "bekar",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reaction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gajjab" => Ok(Self::Gajjab),
            "yesto-ni-hunxa" | "yesto_ni_hunxa" => Ok(Self::YestoNiHunxa),
            "bekar" => Ok(Self::Bekar),
            other => Err(format!("unknown reaction '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOption {
    pub option_id: OptionId,
    pub votes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_nepali: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl VoteOption {
    pub fn new(option_id: impl Into<String>, votes: u64) -> Self {
        Self {
            option_id: OptionId::new(option_id),
            votes,
            label: None,
            label_nepali: None,
            emoji: None,
            image_url: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_label_nepali(mut self, label: impl Into<String>) -> Self {
        self.label_nepali = Some(label.into());
        self
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// Creation-time description of a card: identity, shape and starting tallies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSpec {
    pub card_id: CardId,
    pub variant: CardVariant,
    pub title: String,
    pub options: Vec<VoteOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub votes: u64,
    pub reaction: Option<Reaction>,
}
