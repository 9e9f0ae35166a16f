//! Constructor/JSON tab state machine and whole-filter loading

use super::FilterEditorStore;
use crate::error::EditorError;
use crate::parser::parse_filter_expression;
use crate::serializer::{expression_to_string, group_to_expression};
use filter_expr::logging::codes;
use filter_expr::{log_error, log_success};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which view of the filter the user is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveTab {
    #[default]
    Constructor,
    Json,
}

impl ActiveTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constructor => "constructor",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ActiveTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FilterEditorStore {
    /// Replace the whole filter with the given text
    ///
    /// Failure is recorded as store state: the JSON tab becomes active with
    /// the rejected text so the user can fix it. The tree is left as it was.
    pub fn load_filter(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            let root = self.fresh_root();
            self.replace_root(root);
            self.active_tab = ActiveTab::Constructor;
            self.json_value.clear();
            self.validate_current_state();
            return true;
        }

        match filter_expr::validate_str(text, &self.fields) {
            Ok(expr) => {
                let root = parse_filter_expression(&expr, &mut self.ids);
                self.replace_root(root);
                self.active_tab = ActiveTab::Constructor;
                self.json_value.clear();
                self.validate_current_state();
                log_success!(codes::success::FILTER_LOADED, "Filter loaded",
                    "root" => self.root_id(),
                    "nodes" => self.state.root_group.node_count());
                true
            }
            Err(error) => {
                let error = EditorError::from(error);
                log_error!(codes::editor::LOAD_FAILED, "Filter could not be loaded",
                    "error_type" => error.error_type(),
                    "reason" => &error);
                self.active_tab = ActiveTab::Json;
                self.json_value = text.to_string();
                self.mark_invalid(&error);
                false
            }
        }
    }

    /// Switch views; returns whether the active tab changed
    pub fn set_active_tab(&mut self, tab: ActiveTab) -> bool {
        if tab == self.active_tab {
            return false;
        }

        let switched = match tab {
            ActiveTab::Json => self.enter_json_tab(),
            ActiveTab::Constructor => self.enter_constructor_tab(),
        };

        if switched {
            log_success!(codes::success::TAB_SWITCHED, "Editor tab switched",
                "tab" => tab,
                "valid" => self.is_valid);
        }
        switched
    }

    /// Edit the pending raw text and revalidate
    pub fn set_json_value(&mut self, text: impl Into<String>) {
        self.json_value = text.into();
        self.validate_current_state();
    }

    /// The tab switch always happens; an invalid tree only marks the store
    fn enter_json_tab(&mut self) -> bool {
        let rendered = match group_to_expression(&self.state.root_group) {
            None => Ok(String::new()),
            Some(expr) => expression_to_string(&expr, self.preferences.pretty_json),
        };

        self.active_tab = ActiveTab::Json;
        match rendered {
            Ok(text) => {
                self.json_value = text;
                self.validate_current_state();
            }
            Err(error) => {
                log_error!(codes::editor::SERIALIZATION_FAILED, "Filter tree could not be rendered",
                    "reason" => &error);
                self.json_value.clear();
                self.mark_invalid(&error);
            }
        }
        true
    }

    /// Refused while the pending text does not validate; the tree is kept
    fn enter_constructor_tab(&mut self) -> bool {
        if self.json_value.trim().is_empty() {
            let root = self.fresh_root();
            self.replace_root(root);
        } else {
            match filter_expr::validate_str(&self.json_value, &self.fields) {
                Ok(expr) => {
                    let root = parse_filter_expression(&expr, &mut self.ids);
                    self.replace_root(root);
                }
                Err(error) => {
                    let error = EditorError::from(error);
                    log_error!(codes::editor::TAB_SWITCH_FAILED, "Staying on the JSON tab",
                        "error_type" => error.error_type(),
                        "reason" => &error);
                    self.mark_invalid(&error);
                    return false;
                }
            }
        }

        self.active_tab = ActiveTab::Constructor;
        self.json_value.clear();
        self.validate_current_state();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConditionPatch;
    use filter_expr::{DataType, FieldDef, LogicalOp, Operator};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::new("name", DataType::String),
            FieldDef::new("population", DataType::Integer),
            FieldDef::new("founded", DataType::Date),
        ]
    }

    #[test]
    fn test_same_tab_is_a_no_op() {
        let mut store = FilterEditorStore::new(fields(), None);
        assert!(!store.set_active_tab(ActiveTab::Constructor));
    }

    #[test]
    fn test_entering_json_renders_the_tree() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), Some(r#"["all",["has",["get","name"]]]"#));
        assert!(store.set_active_tab(ActiveTab::Json));
        assert_eq!(store.active_tab(), ActiveTab::Json);

        let rendered: serde_json::Value = serde_json::from_str(store.json_value()).unwrap();
        assert_eq!(rendered, json!(["all", ["has", ["get", "name"]]]));
        assert!(store.is_valid());
    }

    #[test]
    fn test_entering_json_with_no_filter_gives_empty_text() {
        let mut store = FilterEditorStore::new(fields(), None);
        assert!(store.set_active_tab(ActiveTab::Json));
        assert_eq!(store.json_value(), "");
        assert!(store.is_valid());
    }

    #[test]
    fn test_entering_json_with_invalid_tree_still_switches() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), None);
        let id = store.add_condition(store.root_id()).unwrap();
        store.update_condition(id, ConditionPatch::new().operator(Operator::GreaterThan));
        assert!(!store.is_valid());

        assert!(store.set_active_tab(ActiveTab::Json));
        assert_eq!(store.active_tab(), ActiveTab::Json);
        assert!(!store.is_valid());
        assert!(store.validation_error().unwrap().contains("'>'"));
    }

    #[test]
    fn test_valid_text_replaces_the_tree() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), None);
        let old_root = store.root_id();
        store.set_active_tab(ActiveTab::Json);
        store.set_json_value(r#"["any",[">=",["get","founded"],"1900-01-01"]]"#);
        assert!(store.is_valid());

        assert!(store.set_active_tab(ActiveTab::Constructor));
        assert_eq!(store.root_id(), old_root);
        assert_eq!(store.root_group().operator, LogicalOp::Any);
        assert_eq!(store.root_group().len(), 1);
        assert_eq!(store.json_value(), "");
        assert!(store.root_group().check_integrity().is_ok());
    }

    #[test]
    fn test_invalid_text_keeps_the_tree_and_the_tab() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), Some(r#"["all",["has",["get","name"]]]"#));
        let before = store.state().clone();

        store.set_active_tab(ActiveTab::Json);
        store.set_json_value(r#"["all",["has",["get","nonexistent"]]]"#);
        assert!(!store.is_valid());

        assert!(!store.set_active_tab(ActiveTab::Constructor));
        assert_eq!(store.active_tab(), ActiveTab::Json);
        assert_eq!(store.state(), &before);
        assert_eq!(store.validation_error(), Some("Unknown field 'nonexistent'"));
    }

    #[test]
    fn test_malformed_text_is_reported() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), None);
        store.set_active_tab(ActiveTab::Json);
        store.set_json_value("[\"all\",");
        assert!(!store.is_valid());
        assert!(store
            .validation_error()
            .unwrap()
            .starts_with("Filter expression is not valid JSON"));
    }

    #[test]
    fn test_empty_text_resets_the_tree() {
        let mut store = FilterEditorStore::new(fields(), Some(r#"["all",["has",["get","name"]]]"#));
        store.set_active_tab(ActiveTab::Json);
        store.set_json_value("");
        assert!(store.set_active_tab(ActiveTab::Constructor));
        assert!(store.root_group().is_empty());
        assert_eq!(store.to_json_string().unwrap(), None);
    }

    #[test]
    fn test_compact_rendering_preference() {
        let preferences = filter_expr::config::EditorPreferences {
            pretty_json: false,
            ..Default::default()
        };
        let mut store = FilterEditorStore::with_preferences(
            fields(),
            Some(r#"["all",["has",["get","name"]]]"#),
            preferences,
        );
        store.set_active_tab(ActiveTab::Json);
        assert_eq!(store.json_value(), r#"["all",["has",["get","name"]]]"#);
    }

    #[test]
    fn test_failed_load_keeps_tree() {
        init_logging();
        let mut store = FilterEditorStore::new(fields(), Some(r#"["all",["has",["get","name"]]]"#));
        let before = store.state().clone();

        assert!(!store.load_filter(r#"[">",["get","name"],"x"]"#));
        assert_eq!(store.state(), &before);
        assert_eq!(store.active_tab(), ActiveTab::Json);
        assert_eq!(store.json_value(), r#"[">",["get","name"],"x"]"#);
        assert!(!store.is_valid());

        assert!(store.load_filter(r#"["any",["has",["get","name"]]]"#));
        assert_eq!(store.active_tab(), ActiveTab::Constructor);
        assert!(store.is_valid());
    }
}
