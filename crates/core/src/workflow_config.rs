//! Declarative workflow state machine configuration.
//!
//! A [`WorkflowConfig`] describes the editorial state machine for one
//! content type: the ordered set of states, the directed transitions
//! between them, and the role names allowed to execute each transition.
//! Configs are stored as JSON in the settings store and resolved per post
//! type with a global default and a compiled built-in fallback; the value
//! object and all eligibility checks live here, with zero I/O.

use serde::{Deserialize, Serialize};

use crate::roles::{ROLE_ADMIN, ROLE_EDITOR, ROLE_WRITER};
use crate::status::{
    canonical_status, STATUS_COPYDESK, STATUS_DRAFT, STATUS_PARKED, STATUS_PUBLISHED,
    STATUS_SCHEDULED,
};

// ---------------------------------------------------------------------------
// Value objects
// ---------------------------------------------------------------------------

/// A single state in the workflow, with display metadata for admin UIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// A directed, role-gated edge between two workflow states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRule {
    pub from: String,
    pub to: String,
    pub roles: Vec<String>,
    pub label: String,
}

/// The resolved workflow configuration for one content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub states: Vec<WorkflowState>,
    pub transitions: Vec<TransitionRule>,
    #[serde(default)]
    pub publish_roles: Vec<String>,
    #[serde(default)]
    pub edit_published_roles: Vec<String>,
}

// ---------------------------------------------------------------------------
// Eligibility checks
// ---------------------------------------------------------------------------

/// `true` when the actor holds at least one of the required roles.
fn roles_intersect(required: &[String], actor_roles: &[String]) -> bool {
    required.iter().any(|r| actor_roles.iter().any(|a| a == r))
}

impl WorkflowConfig {
    /// Look up a state by key.
    pub fn state(&self, key: &str) -> Option<&WorkflowState> {
        self.states.iter().find(|s| s.key == key)
    }

    /// Transitions the actor may execute from `current_status`.
    ///
    /// Matching canonicalizes the legacy `review` alias on both the current
    /// status and the rule's `from` field, so old persisted rows still match
    /// canonical configs. Declaration order is preserved; the list is never
    /// sorted.
    pub fn available_transitions(
        &self,
        actor_roles: &[String],
        current_status: &str,
    ) -> Vec<&TransitionRule> {
        let current = canonical_status(current_status);
        self.transitions
            .iter()
            .filter(|t| canonical_status(&t.from) == current)
            .filter(|t| roles_intersect(&t.roles, actor_roles))
            .collect()
    }

    /// `true` iff `to_status` is among the targets of
    /// [`available_transitions`](Self::available_transitions).
    pub fn can_transition(
        &self,
        actor_roles: &[String],
        current_status: &str,
        to_status: &str,
    ) -> bool {
        let to = canonical_status(to_status);
        self.available_transitions(actor_roles, current_status)
            .iter()
            .any(|t| canonical_status(&t.to) == to)
    }

    /// `true` when the actor holds a role allowed to publish.
    pub fn can_publish(&self, actor_roles: &[String]) -> bool {
        roles_intersect(&self.publish_roles, actor_roles)
    }

    /// `true` when the actor holds a role allowed to edit live content.
    pub fn can_edit_published(&self, actor_roles: &[String]) -> bool {
        roles_intersect(&self.edit_published_roles, actor_roles)
    }
}

// ---------------------------------------------------------------------------
// Built-in default
// ---------------------------------------------------------------------------

fn state(key: &str, label: &str, color: &str, icon: &str) -> WorkflowState {
    WorkflowState {
        key: key.to_string(),
        label: label.to_string(),
        color: Some(color.to_string()),
        icon: Some(icon.to_string()),
    }
}

fn rule(from: &str, to: &str, roles: &[&str], label: &str) -> TransitionRule {
    TransitionRule {
        from: from.to_string(),
        to: to.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        label: label.to_string(),
    }
}

impl WorkflowConfig {
    /// The compiled default workflow, used when the settings store holds no
    /// config for the post type and no global override.
    ///
    /// Note the legacy `review` status is deliberately absent: it is
    /// accepted as an input alias for `copydesk` but is never a valid
    /// transition target.
    pub fn built_in_default() -> Self {
        const EDITORS: &[&str] = &[ROLE_EDITOR, ROLE_ADMIN];
        const ALL: &[&str] = &[ROLE_WRITER, ROLE_EDITOR, ROLE_ADMIN];

        Self {
            states: vec![
                state(STATUS_DRAFT, "Draft", "#9E9E9E", "pencil"),
                state(STATUS_COPYDESK, "Copy desk", "#FF9800", "eye"),
                state(STATUS_PARKED, "Parked", "#2196F3", "pause"),
                state(STATUS_SCHEDULED, "Scheduled", "#9C27B0", "clock"),
                state(STATUS_PUBLISHED, "Published", "#4CAF50", "globe"),
            ],
            transitions: vec![
                rule(STATUS_DRAFT, STATUS_COPYDESK, ALL, "Submit to copy desk"),
                rule(STATUS_COPYDESK, STATUS_PARKED, EDITORS, "Approve"),
                rule(STATUS_COPYDESK, STATUS_DRAFT, ALL, "Return to draft"),
                rule(STATUS_PARKED, STATUS_DRAFT, EDITORS, "Reopen"),
                rule(STATUS_PARKED, STATUS_SCHEDULED, EDITORS, "Schedule"),
                rule(STATUS_PARKED, STATUS_PUBLISHED, EDITORS, "Publish"),
                rule(STATUS_SCHEDULED, STATUS_PARKED, EDITORS, "Unschedule"),
                rule(STATUS_SCHEDULED, STATUS_PUBLISHED, EDITORS, "Publish now"),
            ],
            publish_roles: EDITORS.iter().map(|r| r.to_string()).collect(),
            edit_published_roles: EDITORS.iter().map(|r| r.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn default_has_five_states_no_review() {
        let config = WorkflowConfig::built_in_default();
        assert_eq!(config.states.len(), 5);
        assert!(config.state("review").is_none());
        assert!(config.state("draft").is_some());
        assert!(config.state("published").is_some());
    }

    #[test]
    fn review_never_a_transition_target() {
        let config = WorkflowConfig::built_in_default();
        assert!(config.transitions.iter().all(|t| t.to != "review"));
    }

    #[test]
    fn writer_can_submit_from_draft() {
        let config = WorkflowConfig::built_in_default();
        let available = config.available_transitions(&roles(&["writer"]), "draft");
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].to, "copydesk");
        assert_eq!(available[0].label, "Submit to copy desk");
    }

    #[test]
    fn writer_cannot_approve_from_copydesk() {
        let config = WorkflowConfig::built_in_default();
        assert!(!config.can_transition(&roles(&["writer"]), "copydesk", "parked"));
        // The writer may still withdraw back to draft.
        assert!(config.can_transition(&roles(&["writer"]), "copydesk", "draft"));
    }

    #[test]
    fn editor_sees_transitions_in_declaration_order() {
        let config = WorkflowConfig::built_in_default();
        let available = config.available_transitions(&roles(&["editor"]), "parked");
        let targets: Vec<&str> = available.iter().map(|t| t.to.as_str()).collect();
        assert_eq!(targets, vec!["draft", "scheduled", "published"]);
    }

    #[test]
    fn legacy_review_status_matches_copydesk_rules() {
        let config = WorkflowConfig::built_in_default();
        // A version persisted under the old "review" status still offers
        // the copydesk transitions.
        assert!(config.can_transition(&roles(&["editor"]), "review", "parked"));
        assert!(config.can_transition(&roles(&["writer"]), "review", "draft"));
    }

    #[test]
    fn no_roles_no_transitions() {
        let config = WorkflowConfig::built_in_default();
        assert!(config.available_transitions(&[], "draft").is_empty());
        assert!(!config.can_transition(&[], "draft", "copydesk"));
    }

    #[test]
    fn unknown_status_has_no_transitions() {
        let config = WorkflowConfig::built_in_default();
        assert!(config
            .available_transitions(&roles(&["admin"]), "limbo")
            .is_empty());
    }

    #[test]
    fn actor_with_any_matching_role_is_eligible() {
        let config = WorkflowConfig::built_in_default();
        let multi = roles(&["writer", "editor"]);
        assert!(config.can_transition(&multi, "copydesk", "parked"));
    }

    #[test]
    fn publish_roles_checked_separately() {
        let config = WorkflowConfig::built_in_default();
        assert!(config.can_publish(&roles(&["editor"])));
        assert!(config.can_publish(&roles(&["admin"])));
        assert!(!config.can_publish(&roles(&["writer"])));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = WorkflowConfig::built_in_default();
        let json = serde_json::to_value(&config).unwrap();
        let back: WorkflowConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.states.len(), config.states.len());
        assert_eq!(back.transitions.len(), config.transitions.len());
        assert_eq!(back.publish_roles, config.publish_roles);
    }

    #[test]
    fn missing_optional_fields_default_when_deserializing() {
        let json = serde_json::json!({
            "states": [{"key": "draft", "label": "Draft"}],
            "transitions": [
                {"from": "draft", "to": "copydesk", "roles": ["writer"], "label": "Submit"}
            ]
        });
        let config: WorkflowConfig = serde_json::from_value(json).unwrap();
        assert!(config.states[0].color.is_none());
        assert!(config.publish_roles.is_empty());
        assert!(config.can_transition(&roles(&["writer"]), "draft", "copydesk"));
    }
}
