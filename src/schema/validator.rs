//! Step validation with per-field error reporting
//!
//! Schemas are compiled once; violations are mapped to at most one
//! human-readable message per field. Cross-field password confirmation is a
//! code-level refinement attached to the confirmation field.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::core::field::FieldId;
use crate::core::record::FormRecord;
use crate::core::step::{StepDef, StepId, StepRegistry};
use crate::schema::registry::SchemaRegistry;

/// One failed field: the field and its single message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: FieldId,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: FieldId, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Step validator with compiled schemas
pub struct StepValidator {
    registry: StepRegistry,
    compiled: HashMap<StepId, JsonValidator>,
}

impl StepValidator {
    /// Compile the embedded schemas for every step
    pub fn new(schemas: &SchemaRegistry, registry: StepRegistry) -> Self {
        let mut compiled = HashMap::new();

        for step in registry.iter() {
            if let Ok(schema_json) = serde_json::from_str::<JsonValue>(schemas.get(step.id)) {
                if let Ok(compiled_schema) = validator_for(&schema_json) {
                    compiled.insert(step.id, compiled_schema);
                }
            }
        }

        Self { registry, compiled }
    }

    /// Validate a candidate against one step's schema
    ///
    /// Only the fields the step owns are checked; extra keys in the
    /// candidate are ignored. At most one issue per field, in step field
    /// order.
    pub fn validate_step(&self, step: &StepDef, candidate: &FormRecord) -> Vec<FieldIssue> {
        let schema = match self.compiled.get(&step.id) {
            Some(s) => s,
            None => return Vec::new(),
        };

        let instance = candidate_json(step, candidate);

        // Keep the highest-precedence violation per field
        let mut worst: HashMap<FieldId, (u8, String)> = HashMap::new();
        for error in schema.iter_errors(&instance) {
            let field = match violating_field(&error) {
                Some(f) => f,
                None => continue,
            };
            let rank = violation_rank(&error.kind);
            let entry = worst.entry(field).or_insert((u8::MAX, String::new()));
            if rank < entry.0 {
                *entry = (rank, issue_message(field, &error.kind));
            }
        }

        let mut issues: Vec<FieldIssue> = step
            .fields
            .iter()
            .filter_map(|f| worst.get(f).map(|(_, msg)| FieldIssue::new(*f, msg.clone())))
            .collect();

        // Cross-field refinement: passwords must match. Runs only once both
        // fields are individually valid; the error lands on the confirmation
        // field, never on the password.
        if step.id == StepId::Account {
            let password = candidate.get(FieldId::Password);
            let confirm = candidate.get(FieldId::ConfirmPassword);
            let clean = |f: FieldId| issues.iter().all(|i| i.field != f);
            if let (Some(password), Some(confirm)) = (password, confirm) {
                if clean(FieldId::Password)
                    && clean(FieldId::ConfirmPassword)
                    && password != confirm
                {
                    issues.push(FieldIssue::new(
                        FieldId::ConfirmPassword,
                        "Passwords do not match",
                    ));
                }
            }
        }

        issues
    }

    /// Validate a single field in the context of the values entered so far
    ///
    /// Used by the prompt layer for live validation on every entry.
    pub fn check_field(
        &self,
        step: &StepDef,
        field: FieldId,
        candidate: &FormRecord,
    ) -> Option<String> {
        self.validate_step(step, candidate)
            .into_iter()
            .find(|issue| issue.field == field)
            .map(|issue| issue.message)
    }

    /// Validate a full record against every step, in step order
    pub fn validate_record(&self, record: &FormRecord) -> Vec<(&'static StepDef, Vec<FieldIssue>)> {
        self.registry
            .iter()
            .map(|step| (step, self.validate_step(step, record)))
            .collect()
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }
}

impl Default for StepValidator {
    fn default() -> Self {
        Self::new(&SchemaRegistry::new(), StepRegistry::new())
    }
}

/// Build the JSON instance for a step: only the fields it owns
fn candidate_json(step: &StepDef, candidate: &FormRecord) -> JsonValue {
    let mut map = Map::new();
    for field in step.fields {
        if let Some(value) = candidate.get(*field) {
            map.insert(
                field.as_str().to_string(),
                JsonValue::String(value.to_string()),
            );
        }
    }
    JsonValue::Object(map)
}

/// Which field a schema violation is about
fn violating_field(error: &JsonSchemaError) -> Option<FieldId> {
    if let ValidationErrorKind::Required { property } = &error.kind {
        return property.as_str().and_then(|s| s.parse().ok());
    }
    error
        .instance_path
        .as_str()
        .trim_start_matches('/')
        .parse()
        .ok()
}

/// Precedence when one field violates several rules at once
fn violation_rank(kind: &ValidationErrorKind) -> u8 {
    match kind {
        ValidationErrorKind::Required { .. } => 0,
        ValidationErrorKind::MinLength { .. } => 1,
        ValidationErrorKind::Pattern { .. } => 2,
        ValidationErrorKind::Type { .. } => 3,
        _ => 4,
    }
}

/// Map a schema violation to the message shown next to the field
fn issue_message(field: FieldId, kind: &ValidationErrorKind) -> String {
    use ValidationErrorKind as Kind;

    match (field, kind) {
        (FieldId::ConfirmPassword, Kind::Required { .. } | Kind::MinLength { .. }) => {
            "Please confirm your password".to_string()
        }
        (FieldId::Username, Kind::MinLength { .. }) => {
            "Username must be at least 4 characters".to_string()
        }
        (FieldId::Password, Kind::MinLength { .. }) => {
            "Password must be at least 6 characters".to_string()
        }
        (FieldId::Email, Kind::Pattern { .. }) => "Invalid email format".to_string(),
        (FieldId::Phone, Kind::Required { .. } | Kind::Pattern { .. }) => {
            "Phone number must be at least 10 digits and contain only numbers".to_string()
        }
        (FieldId::Zip, Kind::Required { .. } | Kind::Pattern { .. }) => {
            "Zip Code must be at least 5 digits and contain only numbers".to_string()
        }
        (_, Kind::Required { .. } | Kind::MinLength { .. }) => {
            format!("{} is required", field.label())
        }
        (_, Kind::Type { .. }) => format!("{} must be text", field.label()),
        _ => format!("{} is invalid", field.label()),
    }
}

/// Record validation failure with source location information
#[derive(Debug, Error, Diagnostic)]
#[error("record validation failed: {summary}")]
#[diagnostic(code(regwiz::schema::validation))]
pub struct RecordValidationError {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<FieldViolation>,
}

/// A single field violation, labeled in the source file
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct FieldViolation {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl RecordValidationError {
    pub fn new(filename: &str, source: &str, issues: &[FieldIssue]) -> Self {
        let violations: Vec<FieldViolation> = issues
            .iter()
            .map(|issue| FieldViolation {
                span: find_field_span(source, issue.field),
                message: issue.message.clone(),
                hint: issue.field.as_str().to_string(),
                help: None,
            })
            .collect();

        let summary = if violations.len() == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", violations.len())
        };

        Self {
            summary,
            src: NamedSource::new(filename, source.to_string()),
            violations,
        }
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }
}

/// Parse a YAML record file, reporting syntax problems as diagnostics
pub fn parse_record(content: &str, filename: &str) -> Result<FormRecord, RecordValidationError> {
    match serde_yml::from_str::<FormRecord>(content) {
        Ok(record) => Ok(record),
        Err(e) => {
            let span = e
                .location()
                .map(|loc| SourceSpan::from((loc.index(), 1)))
                .unwrap_or_else(|| (0, content.len().min(1)).into());
            let violation = FieldViolation {
                span,
                message: format!("YAML parse error: {}", e),
                hint: "invalid record".to_string(),
                help: Some(
                    "Record files map wire field names (fullName, email, ...) to string values"
                        .to_string(),
                ),
            };
            Err(RecordValidationError {
                summary: "1 error".to_string(),
                src: NamedSource::new(filename, content.to_string()),
                violations: vec![violation],
            })
        }
    }
}

/// Locate a field's line in the source for span labeling
fn find_field_span(content: &str, field: FieldId) -> SourceSpan {
    let key = format!("{}:", field.as_str());
    let mut offset = 0usize;
    for line in content.lines() {
        if line.trim_start().starts_with(&key) {
            return (offset, line.len()).into();
        }
        offset += line.len() + 1;
    }
    (0, 0).into()
}
