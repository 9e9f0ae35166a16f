//! Consolidated error codes and classification system
//!
//! Single source of truth for all codes emitted by the filter engine, their
//! metadata, and classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR002");
}

/// Shape and semantic errors raised while validating a textual expression
pub mod validation {
    use super::Code;

    pub const MALFORMED_JSON: Code = Code::new("E100");
    pub const EXPRESSION_TOO_LONG: Code = Code::new("E101");
    pub const NOT_AN_ARRAY: Code = Code::new("E102");
    pub const EMPTY_GROUP: Code = Code::new("E103");
    pub const GROUP_CHILD_NOT_ARRAY: Code = Code::new("E104");
    pub const UNKNOWN_OPERATOR: Code = Code::new("E105");
    pub const WRONG_ARITY: Code = Code::new("E106");
    pub const INVALID_FIELD_REFERENCE: Code = Code::new("E107");
    pub const NESTING_TOO_DEEP: Code = Code::new("E108");
    pub const UNKNOWN_FIELD: Code = Code::new("E120");
    pub const UNSUPPORTED_OPERATOR: Code = Code::new("E121");
    pub const INVALID_VALUE_TYPE: Code = Code::new("E122");
    pub const INVALID_VALUE_PATTERN: Code = Code::new("E123");
}

/// Editor store boundary errors
pub mod editor {
    use super::Code;

    pub const INVALID_STATE: Code = Code::new("E200");
    pub const LOAD_FAILED: Code = Code::new("E201");
    pub const TAB_SWITCH_FAILED: Code = Code::new("E202");
    pub const SERIALIZATION_FAILED: Code = Code::new("E203");
}

pub mod success {
    use super::Code;

    pub const EXPRESSION_VALIDATED: Code = Code::new("I001");
    pub const FILTER_LOADED: Code = Code::new("I002");
    pub const TAB_SWITCHED: Code = Code::new("I003");
    pub const ITEM_MOVED: Code = Code::new("I004");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

const REGISTRY_ENTRIES: &[ErrorMetadata] = &[
    ErrorMetadata::new("ERR001", "System", Severity::Critical, false, "Internal engine error"),
    ErrorMetadata::new("ERR002", "System", Severity::High, false, "Invalid configuration"),
    ErrorMetadata::new("E100", "Shape", Severity::Medium, true, "Expression text is not valid JSON"),
    ErrorMetadata::new("E101", "Shape", Severity::Medium, true, "Expression text exceeds the maximum length"),
    ErrorMetadata::new("E102", "Shape", Severity::Medium, true, "Expression is not a JSON array"),
    ErrorMetadata::new("E103", "Shape", Severity::Medium, true, "Logical group has no children"),
    ErrorMetadata::new("E104", "Shape", Severity::Medium, true, "Logical group child is not an array"),
    ErrorMetadata::new("E105", "Shape", Severity::Medium, true, "Unknown condition operator"),
    ErrorMetadata::new("E106", "Shape", Severity::Medium, true, "Wrong number of operator arguments"),
    ErrorMetadata::new("E107", "Shape", Severity::Medium, true, "Malformed field reference"),
    ErrorMetadata::new("E108", "Shape", Severity::High, true, "Expression nesting exceeds the maximum depth"),
    ErrorMetadata::new("E120", "Semantic", Severity::Medium, true, "Field is not defined"),
    ErrorMetadata::new("E121", "Semantic", Severity::Medium, true, "Operator not supported for field data type"),
    ErrorMetadata::new("E122", "Semantic", Severity::Medium, true, "Value type does not match field data type"),
    ErrorMetadata::new("E123", "Semantic", Severity::Medium, true, "Value does not match the data type pattern"),
    ErrorMetadata::new("E200", "Editor", Severity::Low, true, "Representation requested while editor state is invalid"),
    ErrorMetadata::new("E201", "Editor", Severity::Low, true, "Filter text could not be loaded"),
    ErrorMetadata::new("E202", "Editor", Severity::Low, true, "Raw text could not be applied to the constructor"),
    ErrorMetadata::new("E203", "Editor", Severity::Medium, true, "Filter tree could not be serialized"),
    ErrorMetadata::new("I001", "Success", Severity::Low, true, "Expression validated"),
    ErrorMetadata::new("I002", "Success", Severity::Low, true, "Filter loaded"),
    ErrorMetadata::new("I003", "Success", Severity::Low, true, "Editor tab switched"),
    ErrorMetadata::new("I004", "Success", Severity::Low, true, "Filter item moved"),
];

/// Initialize and get the error registry
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

pub fn get_category(code: &str) -> &'static str {
    get_metadata(code).map(|m| m.category).unwrap_or("Unknown")
}

pub fn get_severity(code: &str) -> Severity {
    get_metadata(code)
        .map(|m| m.severity)
        .unwrap_or(Severity::High)
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code).map(|m| m.recoverable).unwrap_or(false)
}
