// src/domain/changes.rs

use serde_json::Value;

/// Incident fields the audit trail follows. Anything else on the record
/// (child collections, tags) is reconciled separately and not tracked
/// field-by-field.
pub const TRACKED_INCIDENT_FIELDS: &[&str] = &[
    "office",
    "incident_type",
    "date",
    "time",
    "description",
    "notes",
    "cash_loss",
    "merchandise_loss",
    "other_losses",
    "total_loss",
];

/// One detected field mutation, ready to become an audit record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub old: Value,
    pub new: Value,
}

/// Compare two field-value snapshots and emit one change per tracked
/// field whose values differ. Comparison is deep value equality, so
/// structurally equal objects and arrays are not reported.
pub fn diff_tracked(old: &Value, new: &Value, tracked: &[&str]) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    for &field in tracked {
        let old_value = old.get(field).cloned().unwrap_or(Value::Null);
        let new_value = new.get(field).cloned().unwrap_or(Value::Null);

        if old_value != new_value {
            changes.push(FieldChange {
                field: field.to_string(),
                old: old_value,
                new: new_value,
            });
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equal_snapshots_emit_nothing() {
        let old = json!({ "description": "A", "notes": "B" });
        let new = json!({ "description": "A", "notes": "B" });

        let changes = diff_tracked(&old, &new, &["description", "notes"]);
        assert!(changes.is_empty());
    }

    #[test]
    fn only_the_changed_field_is_reported() {
        let old = json!({ "description": "A", "notes": "B" });
        let new = json!({ "description": "A", "notes": "C" });

        let changes = diff_tracked(&old, &new, &["description", "notes"]);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "notes");
        assert_eq!(changes[0].old, json!("B"));
        assert_eq!(changes[0].new, json!("C"));
    }

    #[test]
    fn untracked_fields_are_ignored() {
        let old = json!({ "description": "A", "internal": 1 });
        let new = json!({ "description": "A", "internal": 2 });

        let changes = diff_tracked(&old, &new, &["description"]);
        assert!(changes.is_empty());
    }

    #[test]
    fn structural_equality_not_identity() {
        // same members, different order: objects equal, arrays not
        let old = json!({ "tags": { "a": "1", "b": "2" }, "ids": [1, 2] });
        let new = json!({ "tags": { "b": "2", "a": "1" }, "ids": [2, 1] });

        let changes = diff_tracked(&old, &new, &["tags", "ids"]);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "ids");
    }

    #[test]
    fn missing_field_diffs_against_null() {
        let old = json!({});
        let new = json!({ "notes": "added" });

        let changes = diff_tracked(&old, &new, &["notes"]);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old, Value::Null);
        assert_eq!(changes[0].new, json!("added"));
    }
}
