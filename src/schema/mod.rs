//! Schema system - per-step validation rules

pub mod registry;
pub mod validator;

pub use registry::SchemaRegistry;
pub use validator::{parse_record, FieldIssue, RecordValidationError, StepValidator};
