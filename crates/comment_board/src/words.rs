use shared::{domain::PostCategory, protocol::DraftCheck};

pub const DAILY_WORD_LIMIT: usize = 20;
pub const DEFAULT_WORD_LIMIT: usize = 100;
const WARNING_THRESHOLD: i64 = 5;

pub fn compute_word_limit(category: PostCategory) -> usize {
    match category {
        PostCategory::Daily => DAILY_WORD_LIMIT,
        PostCategory::Politician
        | PostCategory::Community
        | PostCategory::Sports
        | PostCategory::Entertainment => DEFAULT_WORD_LIMIT,
    }
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn check_draft(text: &str, limit: usize) -> DraftCheck {
    let word_count = count_words(text);
    DraftCheck {
        word_count,
        accepted: word_count <= limit,
        remaining_warning: (limit as i64) - (word_count as i64) < WARNING_THRESHOLD,
    }
}

/// Outcome of one keystroke in the comment editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEdit {
    /// Text the editor should hold after the edit.
    pub draft: String,
    /// Check of the attempted text, so the counter can show the overflow.
    pub check: DraftCheck,
}

/// Applies an edit only while it stays within the limit; otherwise the
/// previous draft is kept.
pub fn apply_draft_edit(current: &str, proposed: &str, limit: usize) -> DraftEdit {
    let check = check_draft(proposed, limit);
    let draft = if check.accepted { proposed } else { current };
    DraftEdit {
        draft: draft.to_string(),
        check,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_posts_get_twenty_words() {
        assert_eq!(compute_word_limit(PostCategory::Daily), 20);
        assert_eq!(compute_word_limit(PostCategory::Sports), 100);
        assert_eq!(compute_word_limit(PostCategory::Politician), 100);
    }

    #[test]
    fn counts_whitespace_separated_tokens() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n\t "), 0);
        assert_eq!(count_words("  yo  राम्रो\tyojana\nho "), 4);
    }

    #[test]
    fn over_limit_draft_is_not_accepted() {
        let check = check_draft("one two three", 2);
        assert_eq!(check.word_count, 3);
        assert!(!check.accepted);
        assert!(check.remaining_warning);
    }

    #[test]
    fn empty_draft_passes_the_word_gate() {
        let check = check_draft("", 20);
        assert_eq!(check.word_count, 0);
        assert!(check.accepted);
        assert!(!check.remaining_warning);
    }

    #[test]
    fn warns_when_fewer_than_five_words_remain() {
        let fifteen = vec!["word"; 15].join(" ");
        assert!(!check_draft(&fifteen, 20).remaining_warning);
        let sixteen = vec!["word"; 16].join(" ");
        assert!(check_draft(&sixteen, 20).remaining_warning);
    }

    #[test]
    fn typing_past_the_limit_keeps_previous_draft() {
        let edit = apply_draft_edit("one two", "one two three", 2);
        assert_eq!(edit.draft, "one two");
        assert_eq!(edit.check.word_count, 3);

        let edit = apply_draft_edit("one", "one two", 2);
        assert_eq!(edit.draft, "one two");
        assert!(edit.check.accepted);
    }
}
