use std::{collections::HashMap, sync::Arc, time::Duration};

use comment_board::{compute_word_limit, CommentBoard};
use shared::{
    domain::{CardId, Comment, CommentId, OptionId, PostCategory, PostId, Reaction},
    error::{ApiError, EngineError},
    protocol::{
        CardResults, CardSummary, ClientRequest, DraftCheck, GalleryEvent, GallerySummary,
        PostSummary, VoteResult,
    },
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use vote_ledger::VoteLedger;

pub mod demo;

pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(500);
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Pause between a recorded vote and its results being shown. Zero reveals
    /// in the same call.
    pub reveal_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            reveal_delay: DEFAULT_REVEAL_DELAY,
        }
    }
}

/// The object a presentation layer holds for one gallery session. It owns the
/// vote ledger and the comment board and is the only way to reach them.
pub struct GallerySession {
    ledger: Arc<Mutex<VoteLedger>>,
    board: CommentBoard,
    options: SessionOptions,
    pending_reveals: HashMap<CardId, JoinHandle<()>>,
    events: broadcast::Sender<GalleryEvent>,
}

impl GallerySession {
    pub fn new(ledger: VoteLedger, board: CommentBoard, options: SessionOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            board,
            options,
            pending_reveals: HashMap::new(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GalleryEvent> {
        self.events.subscribe()
    }

    pub async fn cast_vote(
        &mut self,
        card_id: &CardId,
        option_id: &OptionId,
    ) -> Result<VoteResult, EngineError> {
        let vote = self.ledger.lock().await.cast_vote(card_id, option_id)?;
        self.publish(GalleryEvent::VoteRecorded { vote: vote.clone() });
        self.schedule_reveal(card_id).await?;
        Ok(vote)
    }

    pub async fn results(&self, card_id: &CardId) -> Result<CardResults, EngineError> {
        self.ledger.lock().await.compute_results(card_id)
    }

    pub async fn visible_results(
        &self,
        card_id: &CardId,
    ) -> Result<Option<CardResults>, EngineError> {
        self.ledger.lock().await.visible_results(card_id)
    }

    pub async fn is_voted(&self, card_id: &CardId) -> Result<bool, EngineError> {
        self.ledger.lock().await.is_voted(card_id)
    }

    pub async fn is_revealed(&self, card_id: &CardId) -> Result<bool, EngineError> {
        self.ledger.lock().await.is_revealed(card_id)
    }

    pub async fn user_choice(&self, card_id: &CardId) -> Result<Option<OptionId>, EngineError> {
        Ok(self.ledger.lock().await.user_choice(card_id)?.cloned())
    }

    /// The card left the screen: a reveal still waiting on its delay is
    /// dropped and the card is left as it is.
    pub async fn unmount_card(&mut self, card_id: &CardId) -> Result<bool, EngineError> {
        // Holding the ledger keeps a woken reveal task parked on the lock, so
        // the abort lands before it can touch the card.
        let ledger = self.ledger.lock().await;
        let revealed = ledger.is_revealed(card_id)?;
        let Some(handle) = self.pending_reveals.remove(card_id) else {
            return Ok(false);
        };
        handle.abort();
        drop(ledger);
        if revealed {
            return Ok(false);
        }
        debug!("session: pending reveal cancelled card={card_id}");
        self.publish(GalleryEvent::RevealCancelled {
            card_id: card_id.clone(),
        });
        Ok(true)
    }

    /// The card is back on screen. A vote whose reveal was cancelled is
    /// revealed straight away.
    pub async fn mount_card(
        &mut self,
        card_id: &CardId,
    ) -> Result<Option<CardResults>, EngineError> {
        let reveal_pending = self
            .pending_reveals
            .get(card_id)
            .is_some_and(|handle| !handle.is_finished());

        let mut ledger = self.ledger.lock().await;
        if !reveal_pending {
            if let Some(results) = reveal_card(&mut ledger, card_id)? {
                self.publish(GalleryEvent::CardRevealed { results });
            }
        }
        let visible = ledger.visible_results(card_id)?;
        drop(ledger);

        self.publish(GalleryEvent::CardMounted {
            card_id: card_id.clone(),
            results: visible.clone(),
        });
        Ok(visible)
    }

    pub fn check_draft(&self, category: PostCategory, text: &str) -> DraftCheck {
        self.board.check_draft(text, category)
    }

    pub fn comments(&self, post_id: &PostId) -> Result<&[Comment], EngineError> {
        self.board.comments(post_id)
    }

    pub fn submit_comment(
        &mut self,
        post_id: &PostId,
        text: &str,
        category: PostCategory,
    ) -> Result<Comment, EngineError> {
        let comment = self.board.submit_comment(post_id, text, category)?;
        self.publish(GalleryEvent::CommentAdded {
            comment: comment.clone(),
        });
        Ok(comment)
    }

    pub fn react_to_comment(
        &mut self,
        comment_id: &CommentId,
        reaction: Reaction,
    ) -> Result<Comment, EngineError> {
        let comment = self.board.react_to_comment(comment_id, reaction)?;
        self.publish(GalleryEvent::CommentReacted {
            comment: comment.clone(),
        });
        Ok(comment)
    }

    pub async fn summary(&self) -> GallerySummary {
        let cards = self
            .ledger
            .lock()
            .await
            .cards()
            .iter()
            .map(|card| CardSummary {
                card_id: card.card_id.clone(),
                variant: card.variant,
                title: card.title.clone(),
                total_votes: card.total_votes(),
                voted: card.is_voted(),
                user_choice: card.user_choice().cloned(),
                revealed: card.is_revealed(),
            })
            .collect();
        let posts = self
            .board
            .threads()
            .iter()
            .map(|thread| PostSummary {
                post_id: thread.post_id.clone(),
                category: thread.category,
                comment_count: thread.comments().len(),
                engagement: thread.engagement(),
            })
            .collect();
        GallerySummary { cards, posts }
    }

    /// Single entry point for the presentation layer. The returned event is
    /// the direct answer; state changes are also broadcast to subscribers.
    pub async fn handle(&mut self, request: ClientRequest) -> Result<GalleryEvent, ApiError> {
        let response = match request {
            ClientRequest::CastVote { card_id, option_id } => {
                let vote = self.cast_vote(&card_id, &option_id).await?;
                GalleryEvent::VoteRecorded { vote }
            }
            ClientRequest::GetResults { card_id } => {
                let ledger = self.ledger.lock().await;
                GalleryEvent::Results {
                    results: ledger.compute_results(&card_id)?,
                    revealed: ledger.is_revealed(&card_id)?,
                    user_choice: ledger.user_choice(&card_id)?.cloned(),
                }
            }
            ClientRequest::IsVoted { card_id } => {
                let user_choice = self.user_choice(&card_id).await?;
                GalleryEvent::VoteStatus {
                    card_id,
                    voted: user_choice.is_some(),
                    user_choice,
                }
            }
            ClientRequest::UnmountCard { card_id } => GalleryEvent::CardUnmounted {
                reveal_cancelled: self.unmount_card(&card_id).await?,
                card_id,
            },
            ClientRequest::MountCard { card_id } => GalleryEvent::CardMounted {
                results: self.mount_card(&card_id).await?,
                card_id,
            },
            ClientRequest::CheckDraft { category, text } => GalleryEvent::DraftChecked {
                check: self.check_draft(category, &text),
                limit: compute_word_limit(category),
            },
            ClientRequest::SubmitComment {
                post_id,
                text,
                category,
            } => GalleryEvent::CommentAdded {
                comment: self.submit_comment(&post_id, &text, category)?,
            },
            ClientRequest::ReactToComment {
                comment_id,
                reaction,
            } => GalleryEvent::CommentReacted {
                comment: self.react_to_comment(&comment_id, reaction)?,
            },
            ClientRequest::ListComments { post_id } => GalleryEvent::Comments {
                comments: self.comments(&post_id)?.to_vec(),
                post_id,
            },
            ClientRequest::GallerySummary => GalleryEvent::Summary {
                summary: self.summary().await,
            },
        };
        Ok(response)
    }

    async fn schedule_reveal(&mut self, card_id: &CardId) -> Result<(), EngineError> {
        let delay = self.options.reveal_delay;
        if delay.is_zero() {
            let mut ledger = self.ledger.lock().await;
            if let Some(results) = reveal_card(&mut ledger, card_id)? {
                self.publish(GalleryEvent::CardRevealed { results });
            }
            return Ok(());
        }

        let ledger = Arc::clone(&self.ledger);
        let events = self.events.clone();
        let card = card_id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut ledger = ledger.lock().await;
            match reveal_card(&mut ledger, &card) {
                Ok(Some(results)) => {
                    let _ = events.send(GalleryEvent::CardRevealed { results });
                }
                Ok(None) => {}
                Err(err) => warn!("session: deferred reveal failed card={card}: {err}"),
            }
        });
        debug!(
            "session: reveal scheduled card={card_id} delay_ms={}",
            delay.as_millis()
        );
        if let Some(previous) = self.pending_reveals.insert(card_id.clone(), handle) {
            previous.abort();
        }
        Ok(())
    }

    fn publish(&self, event: GalleryEvent) {
        // No subscribers is fine; the direct return value carries the answer.
        let _ = self.events.send(event);
    }
}

impl Drop for GallerySession {
    fn drop(&mut self) {
        for (card_id, handle) in self.pending_reveals.drain() {
            if !handle.is_finished() {
                debug!("session: dropping pending reveal card={card_id}");
                handle.abort();
            }
        }
    }
}

fn reveal_card(
    ledger: &mut VoteLedger,
    card_id: &CardId,
) -> Result<Option<CardResults>, EngineError> {
    if !ledger.reveal(card_id)? {
        return Ok(None);
    }
    let results = ledger.compute_results(card_id)?;
    info!(
        "session: results shown card={card_id} total_votes={}",
        results.total_votes
    );
    Ok(Some(results))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
