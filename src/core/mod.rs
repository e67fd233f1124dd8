//! Core wizard state machine and its collaborators

pub mod config;
pub mod field;
pub mod record;
pub mod step;
pub mod submission;
pub mod wizard;

pub use config::{Config, ThemePreference};
pub use field::{FieldId, InputKind};
pub use record::FormRecord;
pub use step::{step_states, StepDef, StepId, StepRegistry, StepState};
pub use submission::{
    GatewayError, MockGateway, ReceiptId, SubmissionGateway, SubmissionReceipt, SubmissionState,
};
pub use wizard::{Progress, Wizard, WizardError};
