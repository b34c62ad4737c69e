use clap::{Parser, Subcommand};
use comment_board::{apply_draft_edit, compute_word_limit};
use gallery_api::GallerySession;
use serde_json::{json, Value};
use shared::{
    domain::{CardId, CommentId, OptionId, PostCategory, PostId, Reaction},
    protocol::{ClientRequest, GalleryEvent},
};

#[derive(Parser, Debug)]
#[command(name = "gallery", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ShellCommand {
    /// Vote counts and vote status for every card and post.
    Summary,
    Vote {
        card_id: String,
        option_id: String,
    },
    Results {
        card_id: String,
    },
    Unmount {
        card_id: String,
    },
    Mount {
        card_id: String,
    },
    /// Replace the comment draft; rejected if it would go past the word limit.
    Draft {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Submit the given text, or the current draft when none is given.
    Comment {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    React {
        comment_id: String,
        reaction: Reaction,
    },
    Comments,
    Quit,
}

pub fn parse_line(line: &str) -> Result<ShellCommand, clap::Error> {
    ShellLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
}

pub enum Flow {
    Continue(Value),
    Quit,
}

/// Stands in for the presentation layer: holds the comment draft and turns
/// shell commands into session requests.
pub struct Shell {
    session: GallerySession,
    post_id: PostId,
    category: PostCategory,
    draft: String,
}

impl Shell {
    pub fn new(session: GallerySession, post_id: PostId, category: PostCategory) -> Self {
        Self {
            session,
            post_id,
            category,
            draft: String::new(),
        }
    }

    pub fn session(&self) -> &GallerySession {
        &self.session
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub async fn execute(&mut self, command: ShellCommand) -> anyhow::Result<Flow> {
        let request = match command {
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Draft { words } => {
                let edit = apply_draft_edit(
                    &self.draft,
                    &words.join(" "),
                    compute_word_limit(self.category),
                );
                self.draft = edit.draft;
                return Ok(Flow::Continue(json!({
                    "type": "draft",
                    "payload": {
                        "draft": self.draft,
                        "check": edit.check,
                        "limit": compute_word_limit(self.category),
                    }
                })));
            }
            ShellCommand::Comment { words } => {
                let from_draft = words.is_empty();
                let text = if from_draft {
                    self.draft.clone()
                } else {
                    words.join(" ")
                };
                let response = self
                    .dispatch(ClientRequest::SubmitComment {
                        post_id: self.post_id.clone(),
                        text,
                        category: self.category,
                    })
                    .await;
                if from_draft && matches!(response, GalleryEvent::CommentAdded { .. }) {
                    self.draft.clear();
                }
                return Ok(Flow::Continue(serde_json::to_value(response)?));
            }
            ShellCommand::Summary => ClientRequest::GallerySummary,
            ShellCommand::Vote { card_id, option_id } => ClientRequest::CastVote {
                card_id: CardId::new(card_id),
                option_id: OptionId::new(option_id),
            },
            ShellCommand::Results { card_id } => ClientRequest::GetResults {
                card_id: CardId::new(card_id),
            },
            ShellCommand::Unmount { card_id } => ClientRequest::UnmountCard {
                card_id: CardId::new(card_id),
            },
            ShellCommand::Mount { card_id } => ClientRequest::MountCard {
                card_id: CardId::new(card_id),
            },
            ShellCommand::React {
                comment_id,
                reaction,
            } => ClientRequest::ReactToComment {
                comment_id: CommentId::new(comment_id),
                reaction,
            },
            ShellCommand::Comments => ClientRequest::ListComments {
                post_id: self.post_id.clone(),
            },
        };
        let response = self.dispatch(request).await;
        Ok(Flow::Continue(serde_json::to_value(response)?))
    }

    /// Engine errors are answers, not failures of the shell.
    async fn dispatch(&mut self, request: ClientRequest) -> GalleryEvent {
        match self.session.handle(request).await {
            Ok(event) => event,
            Err(err) => GalleryEvent::Error(err),
        }
    }
}
