//! Flashcard decks, persisted locally.

use serde::{Deserialize, Serialize};
use crate::id::{CardId, DeckId};

/// A named deck of flashcards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardDeck {
    /// Unique identifier
    pub id: DeckId,

    /// Deck name
    pub name: String,

    /// Cards in study order
    #[serde(default)]
    pub cards: Vec<Flashcard>,
}

impl FlashcardDeck {
    /// Create an empty deck.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DeckId::new(),
            name: name.into(),
            cards: Vec::new(),
        }
    }

    /// Append a card and return its id.
    pub fn add_card(&mut self, front: impl Into<String>, back: impl Into<String>) -> CardId {
        let card = Flashcard::new(front, back);
        let id = card.id;
        self.cards.push(card);
        id
    }

    /// Remove a card. Returns false if it was not in the deck.
    pub fn remove_card(&mut self, id: CardId) -> bool {
        let before = self.cards.len();
        self.cards.retain(|c| c.id != id);
        self.cards.len() != before
    }

    /// Mark a card as mastered. Returns false if it was not in the deck.
    pub fn mark_mastered(&mut self, id: CardId) -> bool {
        match self.cards.iter_mut().find(|c| c.id == id) {
            Some(card) => {
                card.mastered = true;
                true
            }
            None => false,
        }
    }

    /// Number of mastered cards.
    pub fn mastered_count(&self) -> usize {
        self.cards.iter().filter(|c| c.mastered).count()
    }
}

/// A single two-sided card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Unique identifier
    pub id: CardId,

    /// Prompt side
    pub front: String,

    /// Answer side
    pub back: String,

    /// Whether the student marked the card as known
    #[serde(default)]
    pub mastered: bool,
}

impl Flashcard {
    /// Create an unmastered card.
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            front: front.into(),
            back: back.into(),
            mastered: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_card_lifecycle() {
        let mut deck = FlashcardDeck::new("Biology");
        let cell = deck.add_card("Powerhouse of the cell", "Mitochondria");
        let _dna = deck.add_card("Double helix", "DNA");

        assert_eq!(deck.cards.len(), 2);
        assert!(deck.mark_mastered(cell));
        assert_eq!(deck.mastered_count(), 1);

        assert!(deck.remove_card(cell));
        assert!(!deck.remove_card(cell));
        assert!(!deck.mark_mastered(cell));
        assert_eq!(deck.cards.len(), 1);
    }

    #[test]
    fn test_deck_json_defaults() {
        let deck = FlashcardDeck::new("Empty");
        let mut json = serde_json::to_value(&deck).unwrap();
        json.as_object_mut().unwrap().remove("cards");

        let parsed: FlashcardDeck = serde_json::from_value(json).unwrap();
        assert!(parsed.cards.is_empty());
        assert_eq!(parsed.id, deck.id);
    }
}
