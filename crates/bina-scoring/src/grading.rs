//! Answer grading.
//!
//! Submitted answers are bound to items by [`resolve_answers`], compared with
//! the per-type policy in [`grade_item`], and tallied per category.

use std::collections::HashMap;

use bina_core::catalog::ARRANGE_SEPARATOR;
use bina_core::entities::{AssessmentItem, ItemGrade};
use bina_core::enums::ItemType;
use serde::{Deserialize, Serialize};

use crate::features::RiskFeatures;

/// One answer as sent by the client. `id` is the item id, which may be stale
/// or unknown to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub id: i64,
    pub answer: String,
}

/// Target word of an arrange prompt: the text after the last `->`, trimmed.
#[must_use]
pub fn arrange_target(prompt: &str) -> &str {
    prompt
        .rsplit(ARRANGE_SEPARATOR)
        .next()
        .unwrap_or(prompt)
        .trim()
}

/// Compare an answer against a prompt under the item type's policy.
#[must_use]
pub fn grade_item(item_type: ItemType, prompt: &str, answer: &str) -> bool {
    match item_type {
        ItemType::Letter => answer.trim().to_uppercase() == prompt.trim().to_uppercase(),
        ItemType::Word => answer.trim().to_lowercase() == prompt.trim().to_lowercase(),
        ItemType::Arrange => {
            let compact: String = answer.chars().filter(|c| *c != ' ').collect();
            compact.to_uppercase() == arrange_target(prompt).to_uppercase()
        }
    }
}

/// Bind each answer to an item.
///
/// 1. The answer's `id` names one of the assessment's items: use it.
/// 2. Otherwise the answer's index selects from the items in position order.
/// 3. Otherwise (index past the last item) the answer is skipped.
#[must_use]
pub fn resolve_answers<'a>(
    items: &'a [AssessmentItem],
    answers: &'a [SubmittedAnswer],
) -> Vec<(&'a AssessmentItem, &'a str)> {
    let by_id: HashMap<i64, &AssessmentItem> = items.iter().map(|i| (i.id, i)).collect();
    let mut by_position: Vec<&AssessmentItem> = items.iter().collect();
    by_position.sort_by_key(|i| i.position);

    answers
        .iter()
        .enumerate()
        .filter_map(|(idx, ans)| {
            by_id
                .get(&ans.id)
                .copied()
                .or_else(|| by_position.get(idx).copied())
                .map(|item| (item, ans.answer.as_str()))
        })
        .collect()
}

/// Correct/total counter for one item category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTally {
    pub correct: u32,
    pub total: u32,
}

impl CategoryTally {
    fn record(&mut self, is_correct: bool) {
        self.total += 1;
        if is_correct {
            self.correct += 1;
        }
    }

    /// `correct / total`, or `0.0` when nothing was answered.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.total)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradingOutcome {
    pub grades: Vec<ItemGrade>,
    pub letters: CategoryTally,
    pub words: CategoryTally,
    pub arrange: CategoryTally,
}

impl GradingOutcome {
    /// Feature set from the per-category accuracies; optional features stay unset.
    #[must_use]
    pub fn features(&self) -> RiskFeatures {
        RiskFeatures::from_accuracies(
            self.letters.accuracy(),
            self.words.accuracy(),
            self.arrange.accuracy(),
        )
    }
}

/// Resolve, grade and tally every answer.
#[must_use]
pub fn grade_answers(items: &[AssessmentItem], answers: &[SubmittedAnswer]) -> GradingOutcome {
    let mut outcome = GradingOutcome::default();
    for (item, answer) in resolve_answers(items, answers) {
        let is_correct = grade_item(item.item_type, &item.prompt, answer);
        let tally = match item.item_type {
            ItemType::Letter => &mut outcome.letters,
            ItemType::Word => &mut outcome.words,
            ItemType::Arrange => &mut outcome.arrange,
        };
        tally.record(is_correct);
        outcome.grades.push(ItemGrade {
            item_id: item.id,
            answer: answer.to_string(),
            is_correct,
        });
    }
    outcome
}
