//! Step registry
//!
//! The wizard's pages, in order. Each step owns a disjoint subset of the
//! field catalog; together the steps cover it exactly. The registry is
//! immutable after construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::field::FieldId;

/// Step identifiers, in wizard order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepId {
    Personal,
    Address,
    Account,
}

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Personal => "personal",
            StepId::Address => "address",
            StepId::Account => "account",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One page of the wizard
#[derive(Debug, Clone, Copy)]
pub struct StepDef {
    pub id: StepId,
    pub name: &'static str,
    pub fields: &'static [FieldId],
}

const STEPS: &[StepDef] = &[
    StepDef {
        id: StepId::Personal,
        name: "Personal Info",
        fields: &[FieldId::FullName, FieldId::Email, FieldId::Phone],
    },
    StepDef {
        id: StepId::Address,
        name: "Address Details",
        fields: &[FieldId::Street, FieldId::City, FieldId::Zip],
    },
    StepDef {
        id: StepId::Account,
        name: "Account Setup",
        fields: &[
            FieldId::Username,
            FieldId::Password,
            FieldId::ConfirmPassword,
        ],
    },
];

/// Ordered, immutable sequence of step definitions
#[derive(Debug, Clone, Default)]
pub struct StepRegistry;

impl StepRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn len(&self) -> usize {
        STEPS.len()
    }

    pub fn is_empty(&self) -> bool {
        STEPS.is_empty()
    }

    /// Look up a step by position
    pub fn get(&self, position: usize) -> Option<&'static StepDef> {
        STEPS.get(position)
    }

    /// Position of the last step
    pub fn last_position(&self) -> usize {
        STEPS.len() - 1
    }

    /// Iterate steps in order
    pub fn iter(&self) -> impl Iterator<Item = &'static StepDef> {
        STEPS.iter()
    }

    /// Which step owns a field
    pub fn owner_of(&self, field: FieldId) -> Option<&'static StepDef> {
        STEPS.iter().find(|s| s.fields.contains(&field))
    }
}

/// Display state of a step in the progress indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Complete,
    Active,
    Pending,
}

/// Pure projection of the wizard position onto per-step display states
pub fn step_states(position: usize, registry: &StepRegistry) -> Vec<StepState> {
    (0..registry.len())
        .map(|i| {
            if i < position {
                StepState::Complete
            } else if i == position {
                StepState::Active
            } else {
                StepState::Pending
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_partition_the_field_catalog() {
        let registry = StepRegistry::new();
        let mut seen: Vec<FieldId> = Vec::new();
        for step in registry.iter() {
            for field in step.fields {
                assert!(!seen.contains(field), "{field} owned by two steps");
                seen.push(*field);
            }
        }
        assert_eq!(seen, FieldId::all());
    }

    #[test]
    fn test_lookup_by_position() {
        let registry = StepRegistry::new();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(0).unwrap().id, StepId::Personal);
        assert_eq!(registry.get(2).unwrap().id, StepId::Account);
        assert!(registry.get(3).is_none());
    }

    #[test]
    fn test_owner_of() {
        let registry = StepRegistry::new();
        assert_eq!(registry.owner_of(FieldId::Zip).unwrap().id, StepId::Address);
        assert_eq!(
            registry.owner_of(FieldId::ConfirmPassword).unwrap().id,
            StepId::Account
        );
    }

    #[test]
    fn test_step_states_projection() {
        let registry = StepRegistry::new();
        assert_eq!(
            step_states(1, &registry),
            vec![StepState::Complete, StepState::Active, StepState::Pending]
        );
        assert_eq!(
            step_states(0, &registry),
            vec![StepState::Active, StepState::Pending, StepState::Pending]
        );
    }
}
