//! Editing model behind the filter constructor
//!
//! The store owns the tree, the raw-text view and the validity verdict. Every
//! mutation ends with `validate_current_state`; invalid intermediate states
//! are kept and reported, never rolled back.

pub mod mutations;
pub mod tabs;

pub use mutations::{MoveSource, MoveTarget};
pub use tabs::ActiveTab;

use crate::error::{EditorError, EditorResult};
use crate::parser::parse_filter_expression;
use crate::serializer::{expression_to_string, group_to_expression, group_to_json_string};
use crate::types::{Condition, FilterState, Group, IdGenerator, NodeId};
use filter_expr::config::EditorPreferences;
use filter_expr::{log_debug, FieldDef, LogicalOp};
use serde_json::Value;

/// Filter editor state for one filter document
#[derive(Debug, Clone)]
pub struct FilterEditorStore {
    fields: Vec<FieldDef>,
    preferences: EditorPreferences,
    ids: IdGenerator,
    state: FilterState,
    active_tab: ActiveTab,
    /// Pending raw text of the JSON tab
    json_value: String,
    /// Compact text of the last successful validation; `None` means no filter
    valid_json_value: Option<String>,
    is_valid: bool,
    validation_error: Option<String>,
    scroll_target: Option<NodeId>,
}

impl FilterEditorStore {
    /// Create a store; a non-empty `initial` filter is loaded like `load_filter`
    pub fn new(fields: Vec<FieldDef>, initial: Option<&str>) -> Self {
        Self::with_preferences(fields, initial, EditorPreferences::default())
    }

    pub fn with_preferences(
        fields: Vec<FieldDef>,
        initial: Option<&str>,
        preferences: EditorPreferences,
    ) -> Self {
        let mut ids = IdGenerator::new();
        let root = Group::new(ids.next_id(), LogicalOp::All);
        let mut store = Self {
            fields,
            preferences,
            ids,
            state: FilterState::new(root),
            active_tab: ActiveTab::Constructor,
            json_value: String::new(),
            valid_json_value: None,
            is_valid: true,
            validation_error: None,
            scroll_target: None,
        };

        match initial {
            Some(text) if !text.trim().is_empty() => {
                store.load_filter(text);
            }
            _ => {
                store.validate_current_state();
            }
        }
        store
    }

    // === Accessors ===

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn preferences(&self) -> &EditorPreferences {
        &self.preferences
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn root_group(&self) -> &Group {
        &self.state.root_group
    }

    pub fn root_id(&self) -> NodeId {
        self.state.root_id()
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    pub fn json_value(&self) -> &str {
        &self.json_value
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    pub fn find_condition(&self, id: NodeId) -> Option<&Condition> {
        self.state.root_group.find_condition(id)
    }

    pub fn find_group(&self, id: NodeId) -> Option<&Group> {
        self.state.root_group.find_group(id)
    }

    /// Node the view should scroll into view, cleared on read
    pub fn take_scroll_target(&mut self) -> Option<NodeId> {
        self.scroll_target.take()
    }

    // === Validation ===

    /// Re-derive the textual form from the authoritative view and validate it
    ///
    /// The raw text is authoritative while the JSON tab is active and the
    /// text is non-empty; otherwise the tree is.
    pub fn validate_current_state(&mut self) -> bool {
        let outcome = if self.active_tab == ActiveTab::Json && !self.json_value.trim().is_empty() {
            self.validate_json_text()
        } else {
            self.validate_tree()
        };

        match outcome {
            Ok(text) => {
                self.is_valid = true;
                self.validation_error = None;
                self.valid_json_value = text;
                true
            }
            Err(error) => {
                log_debug!("Filter state is invalid",
                    "tab" => self.active_tab,
                    "error_type" => error.error_type());
                self.mark_invalid(&error);
                false
            }
        }
    }

    fn validate_tree(&self) -> EditorResult<Option<String>> {
        match group_to_expression(&self.state.root_group) {
            None => Ok(None),
            Some(expr) => {
                filter_expr::validate(&expr, &self.fields)?;
                expression_to_string(&expr, false).map(Some)
            }
        }
    }

    /// Canonical text goes through the tree form so both tabs agree on it
    fn validate_json_text(&self) -> EditorResult<Option<String>> {
        let expr = filter_expr::validate_str(&self.json_value, &self.fields)?;
        let mut scratch = IdGenerator::new();
        let root = parse_filter_expression(&expr, &mut scratch);
        group_to_json_string(&root)
    }

    pub(crate) fn mark_invalid(&mut self, error: &EditorError) {
        self.is_valid = false;
        self.validation_error = Some(error.to_string());
        self.valid_json_value = None;
    }

    // === Outputs ===

    /// The validated filter as a value; `Ok(None)` means no filter
    pub fn to_filter_expression(&self) -> EditorResult<Option<Value>> {
        self.to_json_string()?
            .map(|text| serde_json::from_str(&text).map_err(EditorError::from))
            .transpose()
    }

    /// The validated filter as compact JSON text; `Ok(None)` means no filter
    pub fn to_json_string(&self) -> EditorResult<Option<String>> {
        if !self.is_valid {
            let error = EditorError::invalid_state(self.validation_error.as_deref());
            filter_expr::log_error!(error.error_code(), "Filter requested while invalid",
                "reason" => &error);
            return Err(error);
        }
        Ok(self.valid_json_value.clone())
    }

    // === Internals shared by the submodules ===

    /// Empty root carrying the document's root id
    pub(crate) fn fresh_root(&self) -> Group {
        Group::new(self.root_id(), LogicalOp::All)
    }

    /// Swap in a new tree; the root keeps the document's root id
    pub(crate) fn replace_root(&mut self, mut root: Group) {
        root.id = self.root_id();
        self.state = FilterState::new(root);
        self.scroll_target = None;
    }

    fn log_mutation(&self, operation: &str, id: NodeId) {
        if self.preferences.log_mutations {
            log_debug!("Filter tree mutated",
                "operation" => operation,
                "id" => id,
                "nodes" => self.state.root_group.node_count());
        }
    }

    /// Common tail of every structural mutation
    pub(crate) fn after_mutation(&mut self, operation: &str, id: NodeId) {
        self.log_mutation(operation, id);
        self.validate_current_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use filter_expr::DataType;
    use serde_json::json;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::new("name", DataType::String),
            FieldDef::new("population", DataType::Integer),
        ]
    }

    #[test]
    fn test_new_store_is_empty_and_valid() {
        init_logging();
        let store = FilterEditorStore::new(fields(), None);
        assert!(store.is_valid());
        assert!(store.root_group().is_empty());
        assert_eq!(store.active_tab(), ActiveTab::Constructor);
        assert_eq!(store.to_json_string().unwrap(), None);
        assert_eq!(store.to_filter_expression().unwrap(), None);
    }

    #[test]
    fn test_initial_filter_is_loaded() {
        init_logging();
        let store = FilterEditorStore::new(fields(), Some(r#"["any",["has",["get","name"]]]"#));
        assert!(store.is_valid());
        assert_eq!(store.root_group().operator, LogicalOp::Any);
        assert_eq!(
            store.to_filter_expression().unwrap(),
            Some(json!(["any", ["has", ["get", "name"]]]))
        );
    }

    #[test]
    fn test_invalid_initial_filter_lands_on_json_tab() {
        init_logging();
        let text = r#"["==",["get","nonexistent"],1]"#;
        let store = FilterEditorStore::new(fields(), Some(text));
        assert!(!store.is_valid());
        assert_eq!(store.active_tab(), ActiveTab::Json);
        assert_eq!(store.json_value(), text);
        assert_eq!(store.validation_error(), Some("Unknown field 'nonexistent'"));
        assert_matches!(store.to_json_string(), Err(EditorError::InvalidState { .. }));
        assert_matches!(store.to_filter_expression(), Err(EditorError::InvalidState { .. }));
    }

    #[test]
    fn test_both_tabs_give_the_wrapped_form() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), None);
        store.set_active_tab(ActiveTab::Json);
        store.set_json_value(r#"[">",["get","population"],1000000]"#);

        let wrapped = r#"["all",[">",["get","population"],1000000]]"#;
        assert!(store.is_valid());
        assert_eq!(store.to_json_string().unwrap().as_deref(), Some(wrapped));

        store.set_active_tab(ActiveTab::Constructor);
        assert_eq!(store.to_json_string().unwrap().as_deref(), Some(wrapped));
    }

    #[test]
    fn test_empty_json_text_means_no_filter() {
        let mut store = FilterEditorStore::new(fields(), None);
        store.set_active_tab(ActiveTab::Json);
        store.set_json_value("[]");
        assert!(store.is_valid());
        assert_eq!(store.to_json_string().unwrap(), None);
    }

    #[test]
    fn test_root_id_survives_replacement() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), None);
        let root = store.root_id();

        assert!(store.load_filter(r#"["any",["has",["get","name"]]]"#));
        assert_eq!(store.root_id(), root);
        store.clear();
        assert_eq!(store.root_id(), root);
        assert!(store.add_condition(root).is_some());
        assert!(store.root_group().check_integrity().is_ok());
    }

    #[test]
    fn test_invalid_tree_is_reported_not_rolled_back() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), None);
        let root = store.root_id();
        let id = store.add_condition(root).unwrap();
        assert!(store.is_valid());

        store.update_condition(id, crate::types::ConditionPatch::new().value(5));
        assert!(!store.is_valid());
        assert_eq!(store.find_condition(id).unwrap().value, Some(json!(5)));
        assert!(store.validation_error().unwrap().contains("'name'"));

        store.update_condition(id, crate::types::ConditionPatch::new().value("Oslo"));
        assert!(store.is_valid());
        assert_eq!(store.validation_error(), None);
        assert_eq!(
            store.to_json_string().unwrap().as_deref(),
            Some(r#"["all",["==",["get","name"],"Oslo"]]"#)
        );
    }
}
