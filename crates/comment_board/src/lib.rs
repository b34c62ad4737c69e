use std::collections::{HashMap, HashSet};

use chrono::Utc;
use shared::{
    domain::{Comment, CommentId, PostCategory, PostId, Reaction},
    error::{EngineError, EntityKind},
    protocol::DraftCheck,
};
use tracing::{info, warn};
use uuid::Uuid;

pub mod words;

pub use words::{apply_draft_edit, check_draft, compute_word_limit, count_words, DraftEdit};

const AUTHOR_PREFIX: &str = "Anonymous_User_";

#[derive(Debug, Clone)]
pub struct PostThread {
    pub post_id: PostId,
    pub category: PostCategory,
    /// Newest first.
    comments: Vec<Comment>,
}

impl PostThread {
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn engagement(&self) -> u64 {
        self.comments
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(c.votes))
    }
}

fn checked_engagement<'a>(comments: impl IntoIterator<Item = &'a Comment>) -> Option<u64> {
    comments
        .into_iter()
        .try_fold(0u64, |acc, c| acc.checked_add(c.votes))
}

/// Comment threads for every post in the session.
#[derive(Debug, Default)]
pub struct CommentBoard {
    threads: Vec<PostThread>,
    post_index: HashMap<PostId, usize>,
    comment_index: HashMap<CommentId, PostId>,
    next_seq: u64,
}

impl CommentBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a thread for a post, keeping an existing one untouched.
    pub fn open_post(&mut self, post_id: &PostId, category: PostCategory) -> &PostThread {
        let idx = match self.post_index.get(post_id) {
            Some(&idx) => idx,
            None => {
                info!(
                    "comments: opened post={post_id} category={}",
                    category.as_str()
                );
                let idx = self.threads.len();
                self.threads.push(PostThread {
                    post_id: post_id.clone(),
                    category,
                    comments: Vec::new(),
                });
                self.post_index.insert(post_id.clone(), idx);
                idx
            }
        };
        &self.threads[idx]
    }

    /// Loads existing comments, given newest first, behind anything already in
    /// the thread.
    pub fn seed_comments(
        &mut self,
        post_id: &PostId,
        category: PostCategory,
        comments: impl IntoIterator<Item = Comment>,
    ) -> Result<(), EngineError> {
        let mut comments: Vec<Comment> = comments.into_iter().collect();
        let mut batch = HashSet::new();
        for comment in &comments {
            if self.comment_index.contains_key(&comment.comment_id)
                || !batch.insert(comment.comment_id.clone())
            {
                return Err(EngineError::DuplicateComment {
                    comment_id: comment.comment_id.clone(),
                });
            }
        }
        let existing = self
            .thread(post_id)
            .map(|thread| thread.comments())
            .unwrap_or_default();
        if checked_engagement(existing.iter().chain(&comments)).is_none() {
            warn!("comments: rejected seed with overflowing engagement post={post_id}");
            return Err(EngineError::CounterSaturated {
                kind: EntityKind::Post,
                id: post_id.to_string(),
            });
        }

        self.open_post(post_id, category);
        for comment in &mut comments {
            comment.post_id = post_id.clone();
            self.comment_index
                .insert(comment.comment_id.clone(), post_id.clone());
        }
        self.thread_mut(post_id)?.comments.extend(comments);
        Ok(())
    }

    pub fn threads(&self) -> &[PostThread] {
        &self.threads
    }

    pub fn thread(&self, post_id: &PostId) -> Result<&PostThread, EngineError> {
        self.post_index
            .get(post_id)
            .map(|&idx| &self.threads[idx])
            .ok_or_else(|| EngineError::unknown(EntityKind::Post, post_id))
    }

    pub fn comments(&self, post_id: &PostId) -> Result<&[Comment], EngineError> {
        Ok(self.thread(post_id)?.comments())
    }

    pub fn check_draft(&self, text: &str, category: PostCategory) -> DraftCheck {
        check_draft(text, compute_word_limit(category))
    }

    /// Validates and prepends a new comment to the post's thread.
    pub fn submit_comment(
        &mut self,
        post_id: &PostId,
        text: &str,
        category: PostCategory,
    ) -> Result<Comment, EngineError> {
        let text = text.trim();
        if text.is_empty() {
            warn!("comments: rejected empty comment post={post_id}");
            return Err(EngineError::EmptyComment);
        }
        let limit = compute_word_limit(category);
        let check = check_draft(text, limit);
        if !check.accepted {
            warn!(
                "comments: rejected comment over word limit post={post_id} words={} limit={limit}",
                check.word_count
            );
            return Err(EngineError::WordLimitExceeded {
                word_count: check.word_count,
                limit,
            });
        }

        let comment = Comment {
            comment_id: self.next_comment_id(),
            post_id: post_id.clone(),
            text: text.to_string(),
            author: anonymous_author(),
            created_at: Utc::now(),
            votes: 0,
            reaction: None,
        };

        self.open_post(post_id, category);
        let thread = self.thread_mut(post_id)?;
        thread.comments.insert(0, comment.clone());
        self.comment_index
            .insert(comment.comment_id.clone(), post_id.clone());

        info!(
            "comments: added comment={} post={post_id} words={}",
            comment.comment_id, check.word_count
        );
        Ok(comment)
    }

    /// Sets the comment's reaction, replacing any earlier one, and bumps its
    /// engagement counter.
    pub fn react_to_comment(
        &mut self,
        comment_id: &CommentId,
        reaction: Reaction,
    ) -> Result<Comment, EngineError> {
        let post_id = self
            .comment_index
            .get(comment_id)
            .cloned()
            .ok_or_else(|| EngineError::unknown(EntityKind::Comment, comment_id))?;
        let thread = self.thread_mut(&post_id)?;
        let saturated = checked_engagement(&thread.comments)
            .and_then(|total| total.checked_add(1))
            .is_none();
        let comment = thread
            .comments
            .iter_mut()
            .find(|c| &c.comment_id == comment_id)
            .ok_or_else(|| EngineError::unknown(EntityKind::Comment, comment_id))?;
        if saturated {
            warn!("comments: rejected reaction on saturated counter comment={comment_id}");
            return Err(EngineError::CounterSaturated {
                kind: EntityKind::Comment,
                id: comment_id.to_string(),
            });
        }

        // Thread engagement bounds every comment's counter.
        comment.reaction = Some(reaction);
        comment.votes += 1;
        info!(
            "comments: reaction comment={comment_id} reaction={reaction} votes={}",
            comment.votes
        );
        Ok(comment.clone())
    }

    fn thread_mut(&mut self, post_id: &PostId) -> Result<&mut PostThread, EngineError> {
        match self.post_index.get(post_id) {
            Some(&idx) => Ok(&mut self.threads[idx]),
            None => Err(EngineError::unknown(EntityKind::Post, post_id)),
        }
    }

    fn next_comment_id(&mut self) -> CommentId {
        loop {
            self.next_seq += 1;
            let id = CommentId(format!("cmt-{:08}", self.next_seq));
            if !self.comment_index.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Fresh per call and not derived from anything about the participant.
fn anonymous_author() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{AUTHOR_PREFIX}{}", &token[..8])
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
