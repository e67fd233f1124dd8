//! Step wizard controller
//!
//! Owns the wizard position and the accumulated record. Validation gates
//! every forward transition; retreating never discards captured values. The
//! final forward transition does not move the position: it snapshots the
//! merged record and opens the single in-flight submission.

use thiserror::Error;

use crate::core::record::FormRecord;
use crate::core::step::{StepDef, StepRegistry};
use crate::core::submission::{
    GatewayError, SubmissionGateway, SubmissionReceipt, SubmissionState,
};
use crate::schema::validator::{FieldIssue, StepValidator};

/// Outcome of a successful forward transition
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// Moved to the given position
    Moved(usize),
    /// On the last step: the merged record is ready for the gateway
    Submitting(FormRecord),
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<FieldIssue>),

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("submit is only available on the final step")]
    NotFinalStep,
}

/// The wizard state machine
pub struct Wizard {
    validator: StepValidator,
    position: usize,
    accumulated: FormRecord,
    submission: SubmissionState,
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            validator: StepValidator::default(),
            position: 0,
            accumulated: FormRecord::new(),
            submission: SubmissionState::Idle,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn registry(&self) -> &StepRegistry {
        self.validator.registry()
    }

    /// The step the wizard is currently on
    pub fn active_step(&self) -> &'static StepDef {
        self.registry()
            .get(self.position)
            .unwrap_or_else(|| unreachable!("position is bounded by the registry"))
    }

    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_last(&self) -> bool {
        self.position == self.registry().last_position()
    }

    pub fn accumulated(&self) -> &FormRecord {
        &self.accumulated
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn validator(&self) -> &StepValidator {
        &self.validator
    }

    /// Values to pre-populate the active step's inputs with
    pub fn prefill(&self) -> FormRecord {
        self.accumulated.subset(self.active_step().fields)
    }

    /// Pure check of a candidate against the active step's schema
    pub fn validate_active_step(&self, candidate: &FormRecord) -> Vec<FieldIssue> {
        self.validator.validate_step(self.active_step(), candidate)
    }

    /// Capture the active step's validated values and move forward
    ///
    /// On any step but the last, the position advances by one. On the last
    /// step the position stays put: the merged record is returned for the
    /// driver to hand to a gateway, and the submission becomes pending. On
    /// validation failure nothing is mutated.
    pub fn advance(&mut self, candidate: &FormRecord) -> Result<Progress, WizardError> {
        let issues = self.validate_active_step(candidate);
        if !issues.is_empty() {
            return Err(WizardError::Invalid(issues));
        }

        if self.is_last() && self.submission.is_pending() {
            return Err(WizardError::SubmissionInFlight);
        }

        for field in self.active_step().fields {
            if let Some(value) = candidate.get(*field) {
                self.accumulated.set(*field, value);
            }
        }

        if self.is_last() {
            self.submission = SubmissionState::Pending;
            Ok(Progress::Submitting(self.accumulated.clone()))
        } else {
            self.position += 1;
            Ok(Progress::Moved(self.position))
        }
    }

    /// Move back one step; no-op on the first step
    ///
    /// Accumulated values are kept until a future advance overwrites them.
    pub fn retreat(&mut self) -> usize {
        if self.position > 0 {
            self.position -= 1;
        }
        self.position
    }

    /// Record the gateway's verdict for the in-flight submission
    pub fn resolve_submission(&mut self, outcome: Result<SubmissionReceipt, GatewayError>) {
        self.submission = match outcome {
            Ok(receipt) => SubmissionState::Success(receipt),
            Err(e) => SubmissionState::Failure(e.to_string()),
        };
    }

    /// Validate, merge, and run the final submission through a gateway
    ///
    /// Gateway failure is not an `Err`: it is recorded as
    /// [`SubmissionState::Failure`] and recovery is user-initiated
    /// resubmission.
    pub async fn submit<G: SubmissionGateway + ?Sized>(
        &mut self,
        gateway: &G,
        candidate: &FormRecord,
    ) -> Result<(), WizardError> {
        if !self.is_last() {
            return Err(WizardError::NotFinalStep);
        }

        let record = match self.advance(candidate)? {
            Progress::Submitting(record) => record,
            Progress::Moved(_) => unreachable!("advance on the last step never moves"),
        };

        let outcome = gateway.submit(&record).await;
        self.resolve_submission(outcome);
        Ok(())
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldId;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(pairs: &[(FieldId, &str)]) -> FormRecord {
        pairs.iter().map(|(f, v)| (*f, v.to_string())).collect()
    }

    fn personal() -> FormRecord {
        record(&[
            (FieldId::FullName, "Jane Doe"),
            (FieldId::Email, "jane@x.com"),
            (FieldId::Phone, "1234567890"),
        ])
    }

    fn address() -> FormRecord {
        record(&[
            (FieldId::Street, "1 Main St"),
            (FieldId::City, "Oslo"),
            (FieldId::Zip, "12345"),
        ])
    }

    fn account() -> FormRecord {
        record(&[
            (FieldId::Username, "janedoe"),
            (FieldId::Password, "secret1"),
            (FieldId::ConfirmPassword, "secret1"),
        ])
    }

    /// Gateway that counts invocations
    #[derive(Default)]
    struct CountingGateway {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SubmissionGateway for CountingGateway {
        async fn submit(&self, rec: &FormRecord) -> Result<SubmissionReceipt, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SubmissionReceipt::new(rec.clone()))
        }
    }

    /// Gateway that always fails
    struct RejectingGateway;

    #[async_trait]
    impl SubmissionGateway for RejectingGateway {
        async fn submit(&self, _: &FormRecord) -> Result<SubmissionReceipt, GatewayError> {
            Err(GatewayError::Rejected("duplicate username".into()))
        }
    }

    fn wizard_at_final() -> Wizard {
        let mut w = Wizard::new();
        w.advance(&personal()).unwrap();
        w.advance(&address()).unwrap();
        w
    }

    #[test]
    fn test_invalid_candidate_mutates_nothing() {
        let mut w = Wizard::new();
        let err = w.advance(&FormRecord::new()).unwrap_err();

        match err {
            WizardError::Invalid(issues) => assert_eq!(issues.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(w.position(), 0);
        assert!(w.accumulated().is_empty());
    }

    #[test]
    fn test_advance_then_retreat_keeps_accumulated() {
        let mut w = Wizard::new();
        w.advance(&personal()).unwrap();
        assert_eq!(w.position(), 1);

        w.retreat();
        assert_eq!(w.position(), 0);
        assert_eq!(w.accumulated().get(FieldId::FullName), Some("Jane Doe"));
    }

    #[test]
    fn test_retreat_at_first_step_is_noop() {
        let mut w = Wizard::new();
        assert_eq!(w.retreat(), 0);
        assert_eq!(w.position(), 0);
    }

    #[test]
    fn test_reentering_a_step_prefills_from_accumulated() {
        let mut w = Wizard::new();
        w.advance(&personal()).unwrap();
        assert!(w.prefill().is_empty());

        w.retreat();
        assert_eq!(w.prefill().get(FieldId::Email), Some("jane@x.com"));
    }

    #[test]
    fn test_readvancing_overwrites_stale_values() {
        let mut w = Wizard::new();
        w.advance(&personal()).unwrap();
        w.retreat();

        let mut edited = personal();
        edited.set(FieldId::City, "ignored");
        edited.set(FieldId::FullName, "Janet Doe");
        w.advance(&edited).unwrap();

        assert_eq!(w.accumulated().get(FieldId::FullName), Some("Janet Doe"));
        // fields owned by other steps are never captured here
        assert!(!w.accumulated().contains(FieldId::City));
    }

    #[test]
    fn test_advance_on_last_step_does_not_move() {
        let mut w = wizard_at_final();
        assert_eq!(w.position(), 2);

        let progress = w.advance(&account()).unwrap();
        match progress {
            Progress::Submitting(record) => assert_eq!(record.len(), 9),
            Progress::Moved(p) => panic!("moved to {p} past the final step"),
        }
        assert_eq!(w.position(), 2);
        assert!(w.submission().is_pending());
    }

    #[test]
    fn test_final_merge_prefers_fresh_candidate() {
        let mut w = wizard_at_final();
        // stale account values from an earlier pass
        w.advance(&account()).unwrap();
        w.resolve_submission(Err(GatewayError::Rejected("down".into())));

        let mut fresh = account();
        fresh.set(FieldId::Username, "jdoe2026");
        let progress = w.advance(&fresh).unwrap();

        match progress {
            Progress::Submitting(record) => {
                assert_eq!(record.get(FieldId::Username), Some("jdoe2026"));
                assert_eq!(record.get(FieldId::FullName), Some("Jane Doe"));
            }
            _ => panic!("expected a submission"),
        }
    }

    #[test]
    fn test_second_advance_while_pending_is_blocked() {
        let mut w = wizard_at_final();
        w.advance(&account()).unwrap();
        assert!(w.submission().is_pending());

        let err = w.advance(&account()).unwrap_err();
        assert!(matches!(err, WizardError::SubmissionInFlight));
    }

    #[tokio::test]
    async fn test_submit_while_pending_never_reaches_gateway() {
        let mut w = wizard_at_final();
        w.advance(&account()).unwrap();

        let gateway = CountingGateway::default();
        let err = w.submit(&gateway, &account()).await.unwrap_err();

        assert!(matches!(err, WizardError::SubmissionInFlight));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_single_gateway_invocation() {
        let mut w = Wizard::new();
        w.advance(&personal()).unwrap();
        w.advance(&address()).unwrap();

        let gateway = CountingGateway::default();
        w.submit(&gateway, &account()).await.unwrap();

        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        match w.submission() {
            SubmissionState::Success(receipt) => {
                assert_eq!(receipt.record.len(), 9);
                assert_eq!(receipt.record.get(FieldId::Zip), Some("12345"));
            }
            other => panic!("unexpected submission state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_gateway_failure_is_recorded_and_recoverable() {
        let mut w = wizard_at_final();
        w.submit(&RejectingGateway, &account()).await.unwrap();

        match w.submission() {
            SubmissionState::Failure(reason) => {
                assert!(reason.contains("duplicate username"));
            }
            other => panic!("unexpected submission state: {other:?}"),
        }

        // user-initiated resubmission succeeds
        let gateway = CountingGateway::default();
        w.submit(&gateway, &account()).await.unwrap();
        assert!(w.submission().is_success());
    }

    #[tokio::test]
    async fn test_submit_before_final_step_is_rejected() {
        let mut w = Wizard::new();
        let gateway = CountingGateway::default();

        let err = w.submit(&gateway, &personal()).await.unwrap_err();
        assert!(matches!(err, WizardError::NotFinalStep));
        assert_eq!(w.position(), 0);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_final_candidate_blocks_submission() {
        let mut w = wizard_at_final();
        let gateway = CountingGateway::default();

        let bad = record(&[
            (FieldId::Username, "janedoe"),
            (FieldId::Password, "secret1"),
            (FieldId::ConfirmPassword, "secret2"),
        ]);
        let err = w.submit(&gateway, &bad).await.unwrap_err();

        match err {
            WizardError::Invalid(issues) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].field, FieldId::ConfirmPassword);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert!(!w.submission().is_pending());
    }
}
