use shared::{
    domain::{CardId, CardVariant, VoteOption},
    protocol::{CardResults, OptionResult},
};

/// What a card shows before anyone has voted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroVotePolicy {
    /// Every option reads 0%.
    Zero,
    /// Options share 100% evenly, so a fresh face-off reads 50/50 instead of a
    /// "0 vs 0" tie.
    EvenSplit,
}

pub fn zero_vote_policy(variant: CardVariant) -> ZeroVotePolicy {
    match variant {
        CardVariant::FaceOff => ZeroVotePolicy::EvenSplit,
        CardVariant::Traditional
        | CardVariant::MultiChoice
        | CardVariant::YesNo
        | CardVariant::QuickPoll => ZeroVotePolicy::Zero,
    }
}

/// Saturates at `u64::MAX`; registered cards never reach it.
pub fn total_votes(options: &[VoteOption]) -> u64 {
    options
        .iter()
        .fold(0u64, |acc, o| acc.saturating_add(o.votes))
}

pub fn checked_total_votes(options: &[VoteOption]) -> Option<u64> {
    options.iter().try_fold(0u64, |acc, o| acc.checked_add(o.votes))
}

pub fn percentage(votes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    votes as f64 * 100.0 / total as f64
}

/// Results in card order. Percentages are not normalised, so they may miss
/// 100 by floating point rounding.
pub fn tabulate(card_id: &CardId, variant: CardVariant, options: &[VoteOption]) -> CardResults {
    let total = total_votes(options);
    let zero_share = match zero_vote_policy(variant) {
        ZeroVotePolicy::Zero => 0.0,
        ZeroVotePolicy::EvenSplit if options.is_empty() => 0.0,
        ZeroVotePolicy::EvenSplit => 100.0 / options.len() as f64,
    };

    let options = options
        .iter()
        .map(|option| OptionResult {
            option_id: option.option_id.clone(),
            votes: option.votes,
            percentage: if total == 0 {
                zero_share
            } else {
                percentage(option.votes, total)
            },
        })
        .collect();

    CardResults {
        card_id: card_id.clone(),
        variant,
        total_votes: total,
        options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(tallies: &[(&str, u64)]) -> Vec<VoteOption> {
        tallies
            .iter()
            .map(|(id, votes)| VoteOption::new(*id, *votes))
            .collect()
    }

    #[test]
    fn faceoff_splits_evenly_without_votes() {
        let results = tabulate(
            &CardId::from("faceoff"),
            CardVariant::FaceOff,
            &options(&[("1", 0), ("2", 0)]),
        );
        assert!(results.options.iter().all(|o| o.percentage == 50.0));
    }

    #[test]
    fn other_variants_read_zero_without_votes() {
        for variant in [
            CardVariant::Traditional,
            CardVariant::MultiChoice,
            CardVariant::YesNo,
            CardVariant::QuickPoll,
        ] {
            let results = tabulate(
                &CardId::from("card"),
                variant,
                &options(&[("a", 0), ("b", 0), ("c", 0)]),
            );
            assert_eq!(results.total_votes, 0);
            assert!(
                results.options.iter().all(|o| o.percentage == 0.0),
                "{variant:?} should read 0%"
            );
        }
    }

    #[test]
    fn percentages_sum_to_hundred_within_rounding() {
        let results = tabulate(
            &CardId::from("quickpoll"),
            CardVariant::QuickPoll,
            &options(&[("1", 34), ("2", 23), ("3", 12), ("4", 18), ("5", 8)]),
        );
        let sum: f64 = results.options.iter().map(|o| o.percentage).sum();
        assert_eq!(results.total_votes, 95);
        assert!((sum - 100.0).abs() < 1e-9, "sum was {sum}");
    }

    #[test]
    fn totals_do_not_wrap() {
        let tallies = options(&[("yes", u64::MAX), ("no", 1)]);
        assert_eq!(checked_total_votes(&tallies), None);
        assert_eq!(total_votes(&tallies), u64::MAX);
        assert_eq!(checked_total_votes(&options(&[("yes", 2), ("no", 3)])), Some(5));
    }

    #[test]
    fn faceoff_with_votes_uses_plain_ratio() {
        let results = tabulate(
            &CardId::from("faceoff"),
            CardVariant::FaceOff,
            &options(&[("1", 3), ("2", 1)]),
        );
        assert_eq!(results.options[0].percentage, 75.0);
        assert_eq!(results.options[1].percentage, 25.0);
    }
}
