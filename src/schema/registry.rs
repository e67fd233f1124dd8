//! Embedded step schemas
//!
//! One JSON Schema document per wizard step. Each schema constrains only the
//! fields its step owns; the cross-field password check lives in the
//! validator, attached to the confirmation field.

use crate::core::step::StepId;

const PERSONAL_SCHEMA: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Personal Info",
  "type": "object",
  "required": ["fullName", "email", "phone"],
  "properties": {
    "fullName": { "type": "string", "minLength": 1 },
    "email": { "type": "string", "minLength": 1, "pattern": "^[^@\\s]+@[^@\\s]+\\.[^@\\s]+$" },
    "phone": { "type": "string", "pattern": "^[0-9]{10,}$" }
  }
}"##;

const ADDRESS_SCHEMA: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Address Details",
  "type": "object",
  "required": ["street", "city", "zip"],
  "properties": {
    "street": { "type": "string", "minLength": 1 },
    "city": { "type": "string", "minLength": 1 },
    "zip": { "type": "string", "pattern": "^[0-9]{5,}$" }
  }
}"##;

const ACCOUNT_SCHEMA: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Account Setup",
  "type": "object",
  "required": ["username", "password", "confirmPassword"],
  "properties": {
    "username": { "type": "string", "minLength": 4 },
    "password": { "type": "string", "minLength": 6 },
    "confirmPassword": { "type": "string", "minLength": 1 }
  }
}"##;

/// Registry of the per-step schema documents
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Get the schema source for a step
    pub fn get(&self, step: StepId) -> &'static str {
        match step {
            StepId::Personal => PERSONAL_SCHEMA,
            StepId::Address => ADDRESS_SCHEMA,
            StepId::Account => ACCOUNT_SCHEMA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemas_are_valid_json() {
        let registry = SchemaRegistry::new();
        for step in [StepId::Personal, StepId::Address, StepId::Account] {
            let parsed: serde_json::Value = serde_json::from_str(registry.get(step)).unwrap();
            assert_eq!(parsed["type"], "object");
            assert!(parsed["required"].is_array());
        }
    }
}
