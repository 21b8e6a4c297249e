//! Fixed screening item set.
//!
//! Every assessment is seeded with the same nine items, in this order:
//! four letters, four words, one arrangement puzzle.

use crate::enums::ItemType;

pub const LETTER_ITEMS: [&str; 4] = ["A", "B", "D", "P"];
pub const WORD_ITEMS: [&str; 4] = ["Paku", "Baku", "Kuda", "Buku"];
/// `(scrambled, target)` pairs.
pub const ARRANGE_ITEMS: [(&str, &str); 1] = [("K U C I N G", "KUCING")];

/// Separator between the scrambled letters and the target word in an arrange prompt.
pub const ARRANGE_SEPARATOR: &str = "->";

/// An item to insert when an assessment starts. `position` is assigned by
/// [`screening_items`] and is contiguous from zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedItem {
    pub item_type: ItemType,
    pub prompt: String,
    pub position: i64,
}

/// Build an arrange prompt: `"K U C I N G -> KUCING"`.
#[must_use]
pub fn arrange_prompt(scrambled: &str, target: &str) -> String {
    format!("{scrambled} {ARRANGE_SEPARATOR} {target}")
}

/// The full ordered item set for a new assessment.
#[must_use]
pub fn screening_items() -> Vec<SeedItem> {
    let letters = LETTER_ITEMS
        .iter()
        .map(|prompt| (ItemType::Letter, (*prompt).to_string()));
    let words = WORD_ITEMS
        .iter()
        .map(|prompt| (ItemType::Word, (*prompt).to_string()));
    let arrange = ARRANGE_ITEMS
        .iter()
        .map(|(scrambled, target)| (ItemType::Arrange, arrange_prompt(scrambled, target)));

    letters
        .chain(words)
        .chain(arrange)
        .zip(0_i64..)
        .map(|((item_type, prompt), position)| SeedItem {
            item_type,
            prompt,
            position,
        })
        .collect()
}
