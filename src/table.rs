//! Decision table types — the core data model
//!
//! A `RuleTable` is an ordered set of prioritized rules sharing one input
//! and output schema plus a hit policy. Each rule maps input fields to raw
//! condition text and output fields to values.
//!
//! ## Example Table
//!
//! ```yaml
//! slug: loyalty_discount
//! hit_policy: FIRST_HIT
//! input_schema:
//!   - key: age
//!     type: number
//!   - key: tier
//!     type: string
//! output_schema:
//!   - key: discount
//!     type: decimal
//! rules:
//!   - id: r1
//!     priority: 0
//!     inputs: { age: "18..65", tier: "IN ('gold', 'silver')" }
//!     outputs: { discount: 0.15 }
//!   - id: r2
//!     priority: 1
//!     inputs: { age: ">65", tier: "" }
//!     outputs: { discount: 0.2 }
//! ```

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Decimal,
    Boolean,
}

impl FieldType {
    /// Number and Decimal fields share numeric condition semantics
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Number | FieldType::Decimal)
    }
}

/// Evaluation semantics of a table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HitPolicy {
    /// Priority order, first match wins
    #[default]
    FirstHit,
    /// All matches returned
    CollectAll,
    /// Expects exactly one match
    Unique,
}

/// One entry of an input or output schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct FieldDef {
    /// Field name
    pub key: String,

    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// A raw cell value as provided by the editing surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl CellValue {
    /// Textual form used for condition parsing; textual values are trimmed
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::String(s) => s.trim().to_string(),
        }
    }

    /// Blank cells act as wildcards
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// A decision rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Rule {
    /// Stable identity, independent of position
    pub id: String,

    /// Dense ascending position; 0 fires first under FIRST_HIT
    #[serde(default)]
    pub priority: usize,

    /// Raw condition per input field
    #[serde(default)]
    pub inputs: HashMap<String, CellValue>,

    /// Output value per output field
    #[serde(default)]
    pub outputs: HashMap<String, CellValue>,
}

impl Rule {
    /// Raw condition text for one input field; absent cells are blank
    pub fn input_text(&self, key: &str) -> String {
        self.inputs
            .get(key)
            .map(CellValue::as_text)
            .unwrap_or_default()
    }

    /// Raw cell for one input field
    pub fn input_cell(&self, key: &str) -> CellValue {
        self.inputs.get(key).cloned().unwrap_or_default()
    }
}

/// A complete decision table snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Rule Table", description = "Prioritized decision table")]
pub struct RuleTable {
    /// Unique identifier
    pub slug: String,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Evaluation semantics
    #[serde(default)]
    pub hit_policy: HitPolicy,

    /// Ordered input fields
    #[serde(default)]
    pub input_schema: Vec<FieldDef>,

    /// Ordered output fields
    #[serde(default)]
    pub output_schema: Vec<FieldDef>,

    /// Rules in priority order
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RuleTable {
    /// Parse table from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// Serialize table to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_norway::to_string(self).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// Parse table from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// Serialize table to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// Get a rule by ID
    pub fn get_rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Declared type of one input field
    pub fn input_type(&self, key: &str) -> Option<FieldType> {
        self.input_schema
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.field_type)
    }

    /// Compute hash of table for change detection
    pub fn hash(&self) -> String {
        use sha2::{Digest, Sha256};
        let content = self.to_yaml().unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("sha256:{}", hex::encode(&hasher.finalize()[..8]))
    }

    /// Validate structural invariants
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.slug.is_empty() {
            errors.push("Table slug is required".into());
        }

        if self.input_schema.is_empty() {
            errors.push("At least one input field is required".into());
        }

        // Check for duplicate rule IDs
        let mut seen_ids = std::collections::HashSet::new();
        for rule in &self.rules {
            if !seen_ids.insert(&rule.id) {
                errors.push(format!("Duplicate rule ID: {}", rule.id));
            }
        }

        // Priorities must be the dense ascending permutation 0..n-1
        for (idx, rule) in self.rules.iter().enumerate() {
            if rule.priority != idx {
                errors.push(format!(
                    "Rule {} has priority {} but sits at position {}",
                    rule.id, rule.priority, idx
                ));
            }
        }

        errors
    }
}
