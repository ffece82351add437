use crate::{AlarmDocument, Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three action lists of an alarm, invoked when the alarm
/// transitions into the corresponding state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ActionField {
    #[serde(rename = "OKActions")]
    Ok,
    #[serde(rename = "AlarmActions")]
    Alarm,
    #[serde(rename = "InsufficientDataActions")]
    InsufficientData,
}

impl ActionField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionField::Ok => "OKActions",
            ActionField::Alarm => "AlarmActions",
            ActionField::InsufficientData => "InsufficientDataActions",
        }
    }
}

impl fmt::Display for ActionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alarm states whose action lists an edit applies to.
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    Alarm,
    Ok,
    InsufficientData,
    AlarmAndOk,
    All,
}

impl EventScope {
    /// Action lists selected by this scope, in the order they're edited.
    pub fn fields(&self) -> &'static [ActionField] {
        use ActionField::*;

        match self {
            EventScope::Alarm => &[Alarm],
            EventScope::Ok => &[Ok],
            EventScope::InsufficientData => &[InsufficientData],
            EventScope::AlarmAndOk => &[Ok, Alarm],
            EventScope::All => &[Ok, Alarm, InsufficientData],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventScope::Alarm => "alarm",
            EventScope::Ok => "ok",
            EventScope::InsufficientData => "insufficient-data",
            EventScope::AlarmAndOk => "alarm-and-ok",
            EventScope::All => "all",
        }
    }
}

impl fmt::Display for EventScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    #[cfg_attr(feature = "clap", value(name = "add-alarm-action"))]
    Add,
    #[cfg_attr(feature = "clap", value(name = "replace-alarm-action"))]
    Replace,
    #[cfg_attr(feature = "clap", value(name = "remove-alarm-action"))]
    Remove,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChangeKind::Add => "add-alarm-action",
            ChangeKind::Replace => "replace-alarm-action",
            ChangeKind::Remove => "remove-alarm-action",
        })
    }
}

/// An edit of a single action reference across the action lists of a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEdit {
    Add {
        scope: EventScope,
        new_ref: String,
    },
    Remove {
        scope: EventScope,
        current_ref: String,
    },
    Replace {
        scope: EventScope,
        current_ref: String,
        new_ref: String,
    },
}

/// The contents of an action list after an edit was applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: ActionField,
    pub actions: Vec<String>,
}

impl ActionEdit {
    /// Build an edit from loosely-typed command input, requiring the
    /// references that `kind` needs.
    pub fn new(
        kind: ChangeKind,
        scope: EventScope,
        current_ref: Option<String>,
        new_ref: Option<String>,
    ) -> Result<Self, Error> {
        let missing = |argument| Error::MissingRequiredArg {
            operation: kind.to_string(),
            argument,
        };

        Ok(match kind {
            ChangeKind::Add => ActionEdit::Add {
                scope,
                new_ref: new_ref.ok_or_else(|| missing("a new action reference"))?,
            },
            ChangeKind::Remove => ActionEdit::Remove {
                scope,
                current_ref: current_ref.ok_or_else(|| missing("a current action reference"))?,
            },
            ChangeKind::Replace => ActionEdit::Replace {
                scope,
                new_ref: new_ref.ok_or_else(|| missing("a new action reference"))?,
                current_ref: current_ref.ok_or_else(|| missing("a current action reference"))?,
            },
        })
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            ActionEdit::Add { .. } => ChangeKind::Add,
            ActionEdit::Remove { .. } => ChangeKind::Remove,
            ActionEdit::Replace { .. } => ChangeKind::Replace,
        }
    }

    pub fn scope(&self) -> EventScope {
        match self {
            ActionEdit::Add { scope, .. }
            | ActionEdit::Remove { scope, .. }
            | ActionEdit::Replace { scope, .. } => *scope,
        }
    }

    /// Apply the edit to each action list of the scope, returning the new
    /// contents of every list that was visited.
    pub fn apply(&self, doc: &mut AlarmDocument) -> Result<Vec<FieldChange>, Error> {
        let mut changes = Vec::new();

        for &field in self.scope().fields() {
            let mut actions = doc.action_list(field)?;
            self.apply_to(&mut actions);
            doc.set_action_list(field, actions.clone());
            changes.push(FieldChange { field, actions });
        }
        Ok(changes)
    }

    fn apply_to(&self, actions: &mut Vec<String>) {
        match self {
            ActionEdit::Add { new_ref, .. } => actions.push(new_ref.clone()),
            ActionEdit::Remove { current_ref, .. } => remove_first(actions, current_ref),
            ActionEdit::Replace {
                current_ref,
                new_ref,
                ..
            } => {
                // The new reference is only added to lists which hold the
                // current one. Lists without it are left untouched.
                if actions.contains(current_ref) {
                    actions.push(new_ref.clone());
                }
                remove_first(actions, current_ref);
            }
        }
    }
}

fn remove_first(actions: &mut Vec<String>, target: &str) {
    if let Some(index) = actions.iter().position(|action| action == target) {
        actions.remove(index);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc_with(field: ActionField, actions: &[&str]) -> AlarmDocument {
        let mut doc = AlarmDocument::default();
        doc.set_name("cpu-high");
        doc.set_action_list(field, actions.iter().map(|a| a.to_string()).collect());
        doc
    }

    fn add(scope: EventScope, new_ref: &str) -> ActionEdit {
        ActionEdit::new(ChangeKind::Add, scope, None, Some(new_ref.to_string())).unwrap()
    }

    fn remove(scope: EventScope, current_ref: &str) -> ActionEdit {
        ActionEdit::new(ChangeKind::Remove, scope, Some(current_ref.to_string()), None).unwrap()
    }

    fn replace(scope: EventScope, current_ref: &str, new_ref: &str) -> ActionEdit {
        ActionEdit::new(
            ChangeKind::Replace,
            scope,
            Some(current_ref.to_string()),
            Some(new_ref.to_string()),
        )
        .unwrap()
    }

    fn list(doc: &AlarmDocument, field: ActionField) -> Vec<String> {
        doc.action_list(field).unwrap()
    }

    #[test]
    fn test_scope_fields() {
        use ActionField::*;

        assert_eq!(EventScope::Alarm.fields(), &[Alarm]);
        assert_eq!(EventScope::Ok.fields(), &[Ok]);
        assert_eq!(EventScope::InsufficientData.fields(), &[InsufficientData]);
        assert_eq!(EventScope::AlarmAndOk.fields(), &[Ok, Alarm]);
        assert_eq!(EventScope::All.fields(), &[Ok, Alarm, InsufficientData]);
    }

    #[test]
    fn test_add_appends_without_dedup() {
        let mut doc = doc_with(ActionField::Alarm, &["arn:a"]);
        let edit = add(EventScope::Alarm, "arn:b");

        edit.apply(&mut doc).unwrap();
        assert_eq!(list(&doc, ActionField::Alarm), vec!["arn:a", "arn:b"]);

        edit.apply(&mut doc).unwrap();
        assert_eq!(list(&doc, ActionField::Alarm), vec!["arn:a", "arn:b", "arn:b"]);
    }

    #[test]
    fn test_add_creates_missing_lists() {
        let mut doc = doc_with(ActionField::Alarm, &["arn:a"]);
        let changes = add(EventScope::All, "arn:b").apply(&mut doc).unwrap();

        assert_eq!(
            changes,
            vec![
                FieldChange {
                    field: ActionField::Ok,
                    actions: vec!["arn:b".to_string()],
                },
                FieldChange {
                    field: ActionField::Alarm,
                    actions: vec!["arn:a".to_string(), "arn:b".to_string()],
                },
                FieldChange {
                    field: ActionField::InsufficientData,
                    actions: vec!["arn:b".to_string()],
                },
            ]
        );
        assert_eq!(doc.get("OKActions"), Some(&json!(["arn:b"])));
    }

    #[test]
    fn test_remove_first_occurrence_only() {
        let mut doc = doc_with(ActionField::Ok, &["arn:a", "arn:b", "arn:a"]);
        remove(EventScope::Ok, "arn:a").apply(&mut doc).unwrap();
        assert_eq!(list(&doc, ActionField::Ok), vec!["arn:b", "arn:a"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut doc = doc_with(ActionField::Ok, &["arn:a", "arn:b"]);
        remove(EventScope::Ok, "arn:z").apply(&mut doc).unwrap();
        assert_eq!(list(&doc, ActionField::Ok), vec!["arn:a", "arn:b"]);
    }

    #[test]
    fn test_replace_appends_then_removes() {
        let mut doc = doc_with(ActionField::Alarm, &["arn:c", "arn:x", "arn:c"]);
        replace(EventScope::Alarm, "arn:c", "arn:n")
            .apply(&mut doc)
            .unwrap();

        // Not a positional swap: the new reference lands at the end.
        assert_eq!(
            list(&doc, ActionField::Alarm),
            vec!["arn:x", "arn:c", "arn:n"]
        );
    }

    #[test]
    fn test_replace_absent_is_noop() {
        let mut doc = doc_with(ActionField::Alarm, &["arn:a"]);
        replace(EventScope::Alarm, "arn:c", "arn:n")
            .apply(&mut doc)
            .unwrap();
        assert_eq!(list(&doc, ActionField::Alarm), vec!["arn:a"]);
    }

    #[test]
    fn test_replace_per_field() {
        let mut doc = doc_with(ActionField::Ok, &["arn:c"]);
        doc.set_action_list(ActionField::Alarm, vec!["arn:a".to_string()]);

        replace(EventScope::AlarmAndOk, "arn:c", "arn:n")
            .apply(&mut doc)
            .unwrap();

        assert_eq!(list(&doc, ActionField::Ok), vec!["arn:n"]);
        assert_eq!(list(&doc, ActionField::Alarm), vec!["arn:a"]);
    }

    #[test]
    fn test_missing_required_refs() {
        let err = ActionEdit::new(ChangeKind::Add, EventScope::Alarm, Some("arn:c".into()), None)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "add-alarm-action requires a new action reference"
        );

        let err = ActionEdit::new(ChangeKind::Remove, EventScope::Ok, None, Some("arn:n".into()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "remove-alarm-action requires a current action reference"
        );

        let replace = |current: Option<&str>, new: Option<&str>| {
            ActionEdit::new(
                ChangeKind::Replace,
                EventScope::All,
                current.map(str::to_string),
                new.map(str::to_string),
            )
        };
        assert!(replace(None, Some("n")).is_err());
        assert!(replace(Some("c"), None).is_err());
        assert!(replace(Some("c"), Some("n")).is_ok());
    }

    #[test]
    fn test_invalid_list_is_rejected() {
        let mut doc = AlarmDocument::default();
        doc.insert("AlarmActions", json!({"not": "a list"}));

        let err = add(EventScope::Alarm, "arn:b").apply(&mut doc).unwrap_err();
        assert!(matches!(err, Error::InvalidActionList { .. }));
    }
}
