// src/domain/reconcile.rs

use crate::domain::records::LossItem;
use std::collections::HashSet;

/// Outcome of diffing the submitted loss-item list against the list that
/// was persisted when the edit page loaded.
///
/// - `create`/`update` are indices into the submitted list
/// - `delete` holds ids present in the original set but absent from the
///   submission
///
/// The three sets are disjoint by construction: a submitted item is
/// classified exactly once, and `delete` only contains ids that no
/// submitted item still carries.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub create: Vec<usize>,
    pub update: Vec<usize>,
    pub delete: Vec<i64>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

/// Partition the submitted items:
/// - no id, or an id the original set does not contain -> create
/// - id present in the original set -> update
/// - original ids no submitted item carries -> delete
pub fn plan(original: &[LossItem], submitted: &[LossItem]) -> ReconcilePlan {
    let original_ids: HashSet<i64> = original.iter().filter_map(|item| item.id).collect();

    let mut result = ReconcilePlan::default();

    for (index, item) in submitted.iter().enumerate() {
        match item.id {
            Some(id) if original_ids.contains(&id) => result.update.push(index),
            _ => result.create.push(index),
        }
    }

    let submitted_ids: HashSet<i64> = submitted.iter().filter_map(|item| item.id).collect();

    let mut delete: Vec<i64> = original_ids
        .difference(&submitted_ids)
        .copied()
        .collect();
    delete.sort_unstable();
    result.delete = delete;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kinds::LossCategory;

    fn item(id: Option<i64>, description: &str) -> LossItem {
        LossItem {
            id,
            category: LossCategory::Merchandise,
            description: description.to_string(),
            quantity: 1,
            unit_price: 100,
        }
    }

    #[test]
    fn splits_into_create_update_delete() {
        let original = vec![item(Some(1), "a"), item(Some(2), "b")];
        let submitted = vec![item(Some(1), "a edited"), item(None, "new")];

        let plan = plan(&original, &submitted);

        assert_eq!(plan.update, vec![0]);
        assert_eq!(plan.create, vec![1]);
        assert_eq!(plan.delete, vec![2]);
    }

    #[test]
    fn unknown_id_counts_as_create() {
        // An id the original set never contained (e.g. copied in from
        // another incident) must not be patched blindly.
        let original = vec![item(Some(1), "a")];
        let submitted = vec![item(Some(99), "stray")];

        let plan = plan(&original, &submitted);

        assert_eq!(plan.create, vec![0]);
        assert!(plan.update.is_empty());
        assert_eq!(plan.delete, vec![1]);
    }

    #[test]
    fn empty_submission_deletes_everything() {
        let original = vec![item(Some(3), "x"), item(Some(7), "y")];
        let plan = plan(&original, &[]);

        assert!(plan.create.is_empty());
        assert!(plan.update.is_empty());
        assert_eq!(plan.delete, vec![3, 7]);
    }

    #[test]
    fn empty_original_creates_everything() {
        let submitted = vec![item(None, "x"), item(None, "y")];
        let plan = plan(&[], &submitted);

        assert_eq!(plan.create, vec![0, 1]);
        assert!(plan.update.is_empty());
        assert!(plan.delete.is_empty());
    }

    #[test]
    fn partition_is_disjoint_and_covers_the_original_set() {
        let original = vec![
            item(Some(1), "a"),
            item(Some(2), "b"),
            item(Some(3), "c"),
        ];
        let submitted = vec![
            item(Some(2), "b"),
            item(None, "fresh"),
            item(Some(8), "stray"),
        ];

        let plan = plan(&original, &submitted);

        // no submitted index classified twice
        for index in &plan.create {
            assert!(!plan.update.contains(index));
        }

        // updates are exactly original ∩ submitted ids
        let updated_ids: Vec<i64> = plan
            .update
            .iter()
            .filter_map(|&i| submitted[i].id)
            .collect();
        assert_eq!(updated_ids, vec![2]);

        // deletes are exactly original \ submitted ids
        assert_eq!(plan.delete, vec![1, 3]);

        // nothing deleted is also updated
        for id in &plan.delete {
            assert!(!updated_ids.contains(id));
        }
    }
}
