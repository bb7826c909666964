//! Phrase deck
//!
//! A fresh working copy is built for every round and never mutated after.

use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// A single phrase card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub phrase: String,
    #[serde(default)]
    pub hint: String,
}

impl Card {
    pub fn new(phrase: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            hint: hint.into(),
        }
    }
}

/// Ordered working deck for one round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Copy `source`, optionally applying a uniform Fisher-Yates shuffle
    pub fn build(source: &[Card], shuffle: bool, rng: &mut Pcg32) -> Self {
        let mut cards = source.to_vec();
        if shuffle {
            cards.shuffle(rng);
        }
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
