use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// === DATA TYPES ===

/// Field data types understood by the filter grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    String,
    Integer,
    BigInt,
    Real,
    Date,
    Time,
    DateTime,
}

impl DataType {
    /// Parse data type from its wire name (exact match, case-sensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "STRING" => Some(Self::String),
            "INTEGER" => Some(Self::Integer),
            "BIGINT" => Some(Self::BigInt),
            "REAL" => Some(Self::Real),
            "DATE" => Some(Self::Date),
            "TIME" => Some(Self::Time),
            "DATETIME" => Some(Self::DateTime),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Real => "REAL",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::DateTime => "DATETIME",
        }
    }

    /// Types whose values are plain JSON numbers
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }

    /// Types whose values are strings constrained by a fixed pattern
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::DateTime)
    }

    /// Value given to a freshly added `==` condition on a field of this type
    pub fn default_value(&self) -> Value {
        let today = || chrono::Local::now().format("%Y-%m-%d").to_string();
        match self {
            Self::String => Value::String(String::new()),
            Self::Integer | Self::Real => Value::from(0),
            Self::BigInt => Value::String("0".to_string()),
            Self::Date => Value::String(today()),
            Self::Time => Value::String("00:00:00".to_string()),
            Self::DateTime => Value::String(format!("{}T00:00:00", today())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// === LOGICAL OPERATORS ===

/// Group combinators (`all` = every child matches, `any` = at least one)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOp {
    #[default]
    All,
    Any,
}

impl LogicalOp {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// === FIELD DEFINITIONS ===

/// A filterable field as described by the hosting resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub key: String,
    pub datatype: DataType,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl FieldDef {
    pub fn new(key: impl Into<String>, datatype: DataType) -> Self {
        Self {
            key: key.into(),
            datatype,
            id: None,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Human-readable label, falling back to the key
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.key)
    }
}

/// Look up a field definition by key
pub fn find_field<'a>(fields: &'a [FieldDef], key: &str) -> Option<&'a FieldDef> {
    fields.iter().find(|field| field.key == key)
}
