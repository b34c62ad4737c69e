use std::collections::{HashMap, HashSet};

use shared::{
    domain::{CardId, CardSpec, CardVariant, OptionId, Reaction, VoteOption},
    error::{EngineError, EntityKind},
    protocol::{CardResults, VoteResult},
};
use tracing::{info, warn};

pub mod aggregate;

pub use aggregate::{zero_vote_policy, ZeroVotePolicy};

#[derive(Debug, Clone)]
pub struct VotingCard {
    pub card_id: CardId,
    pub variant: CardVariant,
    pub title: String,
    options: Vec<VoteOption>,
    user_choice: Option<OptionId>,
    revealed: bool,
}

impl VotingCard {
    pub fn user_choice(&self) -> Option<&OptionId> {
        self.user_choice.as_ref()
    }

    pub fn is_voted(&self) -> bool {
        self.user_choice.is_some()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn total_votes(&self) -> u64 {
        aggregate::total_votes(&self.options)
    }
}

/// Tallies and the local participant's choice for every card in a gallery
/// session. Cards are listed in registration order.
#[derive(Debug, Default)]
pub struct VoteLedger {
    cards: Vec<VotingCard>,
    index: HashMap<CardId, usize>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(specs: impl IntoIterator<Item = CardSpec>) -> Result<Self, EngineError> {
        let mut ledger = Self::new();
        for spec in specs {
            ledger.register_card(spec)?;
        }
        Ok(ledger)
    }

    pub fn register_card(&mut self, spec: CardSpec) -> Result<(), EngineError> {
        if self.index.contains_key(&spec.card_id) {
            return Err(invalid_card(&spec.card_id, "card id already registered"));
        }
        validate_shape(&spec)?;
        let Some(total_votes) = aggregate::checked_total_votes(&spec.options) else {
            return Err(invalid_card(&spec.card_id, "vote tallies overflow"));
        };

        info!(
            "ledger: registered card={} variant={} options={} total_votes={total_votes}",
            spec.card_id,
            spec.variant.as_str(),
            spec.options.len(),
        );
        self.index.insert(spec.card_id.clone(), self.cards.len());
        self.cards.push(VotingCard {
            card_id: spec.card_id,
            variant: spec.variant,
            title: spec.title,
            options: spec.options,
            user_choice: None,
            revealed: false,
        });
        Ok(())
    }

    pub fn cards(&self) -> &[VotingCard] {
        &self.cards
    }

    pub fn card(&self, card_id: &CardId) -> Result<&VotingCard, EngineError> {
        self.index
            .get(card_id)
            .map(|&idx| &self.cards[idx])
            .ok_or_else(|| EngineError::unknown(EntityKind::Card, card_id))
    }

    fn card_mut(&mut self, card_id: &CardId) -> Result<&mut VotingCard, EngineError> {
        match self.index.get(card_id) {
            Some(&idx) => Ok(&mut self.cards[idx]),
            None => Err(EngineError::unknown(EntityKind::Card, card_id)),
        }
    }

    /// Records the participant's one vote on a card. Nothing changes when the
    /// call fails.
    pub fn cast_vote(
        &mut self,
        card_id: &CardId,
        option_id: &OptionId,
    ) -> Result<VoteResult, EngineError> {
        let card = self.card_mut(card_id)?;
        if card.user_choice.is_some() {
            warn!("ledger: rejected repeat vote card={card_id} option={option_id}");
            return Err(EngineError::AlreadyVoted {
                card_id: card_id.clone(),
            });
        }

        let Some(idx) = card.options.iter().position(|o| &o.option_id == option_id) else {
            warn!("ledger: rejected vote for unknown option card={card_id} option={option_id}");
            return Err(EngineError::InvalidOption {
                card_id: card_id.clone(),
                option_id: option_id.clone(),
            });
        };
        // The option tally is part of the total, so a total that fits means
        // the option fits too.
        let Some(total_votes) = card.total_votes().checked_add(1) else {
            warn!("ledger: rejected vote on saturated tally card={card_id} option={option_id}");
            return Err(EngineError::CounterSaturated {
                kind: EntityKind::Card,
                id: card_id.to_string(),
            });
        };
        let option = &mut card.options[idx];
        option.votes += 1;
        let option_votes = option.votes;
        card.user_choice = Some(option_id.clone());

        info!("ledger: vote recorded card={card_id} option={option_id} total_votes={total_votes}");
        Ok(VoteResult {
            card_id: card_id.clone(),
            option_id: option_id.clone(),
            option_votes,
            total_votes,
        })
    }

    pub fn is_voted(&self, card_id: &CardId) -> Result<bool, EngineError> {
        Ok(self.card(card_id)?.is_voted())
    }

    pub fn user_choice(&self, card_id: &CardId) -> Result<Option<&OptionId>, EngineError> {
        Ok(self.card(card_id)?.user_choice())
    }

    pub fn is_revealed(&self, card_id: &CardId) -> Result<bool, EngineError> {
        Ok(self.card(card_id)?.is_revealed())
    }

    /// Exposes results for a card that has been voted on. Returns whether the
    /// flag changed; an unvoted card stays hidden.
    pub fn reveal(&mut self, card_id: &CardId) -> Result<bool, EngineError> {
        let card = self.card_mut(card_id)?;
        if !card.is_voted() || card.revealed {
            return Ok(false);
        }
        card.revealed = true;
        info!("ledger: results revealed card={card_id}");
        Ok(true)
    }

    pub fn compute_results(&self, card_id: &CardId) -> Result<CardResults, EngineError> {
        let card = self.card(card_id)?;
        Ok(aggregate::tabulate(
            &card.card_id,
            card.variant,
            &card.options,
        ))
    }

    /// Results as the presentation layer may show them: hidden until revealed.
    pub fn visible_results(&self, card_id: &CardId) -> Result<Option<CardResults>, EngineError> {
        let card = self.card(card_id)?;
        if !card.revealed {
            return Ok(None);
        }
        self.compute_results(card_id).map(Some)
    }
}

fn invalid_card(card_id: &CardId, reason: impl Into<String>) -> EngineError {
    EngineError::InvalidCard {
        card_id: card_id.clone(),
        reason: reason.into(),
    }
}

fn validate_shape(spec: &CardSpec) -> Result<(), EngineError> {
    let mut seen = HashSet::new();
    for option in &spec.options {
        if option.option_id.as_str().trim().is_empty() {
            return Err(invalid_card(&spec.card_id, "option id must not be blank"));
        }
        if !seen.insert(&option.option_id) {
            return Err(invalid_card(
                &spec.card_id,
                format!("duplicate option id '{}'", option.option_id),
            ));
        }
    }

    let count = spec.options.len();
    match spec.variant {
        CardVariant::Traditional => {
            let sentiments_only = count == Reaction::ALL.len()
                && Reaction::ALL
                    .iter()
                    .all(|r| seen.contains(&OptionId::from(r.as_str())));
            if !sentiments_only {
                return Err(invalid_card(
                    &spec.card_id,
                    "traditional cards use exactly the gajjab, yesto-ni-hunxa and bekar options",
                ));
            }
        }
        CardVariant::FaceOff | CardVariant::YesNo if count != 2 => {
            return Err(invalid_card(
                &spec.card_id,
                format!("{} cards need exactly 2 options, got {count}", spec.variant.as_str()),
            ));
        }
        CardVariant::MultiChoice | CardVariant::QuickPoll if count < 2 => {
            return Err(invalid_card(
                &spec.card_id,
                format!("{} cards need at least 2 options, got {count}", spec.variant.as_str()),
            ));
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
