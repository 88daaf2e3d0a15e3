use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::domain::{FarmIntakeForm, IntakeField};
use super::normalizer::FarmAnalysisRequest;
use super::phone;
use super::store::{SessionStore, StoreError, API_RESPONSE_KEY, ELIGIBILITY_DATA_KEY};
use super::validation::{
    is_form_valid, shows_cultivated_area_hint, validate_field, ValidatedIntake, ValidationErrors,
};
use crate::workflows::scoring::{carries_estimate, AnalysisGateway, GatewayError, ProxyReply};

/// Route the visitor is sent to after a successful analysis.
pub const RESULTS_PATH: &str = "/resultado";

const GENERIC_FAILURE_MESSAGE: &str =
    "Ocorreu um erro ao enviar seus dados. Por favor, tente novamente.";

const CONNECT_FAILURE_MESSAGE: &str = "Não foi possível conectar ao servidor. Verifique sua conexão ou tente novamente mais tarde. Se o problema persistir, pode ser um problema de CORS no servidor.";

/// Where a single intake visit stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakePhase {
    Editing,
    Validating,
    Submitting,
    Success,
    Error,
}

impl IntakePhase {
    pub const fn label(self) -> &'static str {
        match self {
            IntakePhase::Editing => "editing",
            IntakePhase::Validating => "validating",
            IntakePhase::Submitting => "submitting",
            IntakePhase::Success => "success",
            IntakePhase::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// Transient message raised by a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub variant: NotificationVariant,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Destructive,
            title: title.to_string(),
            description: description.into(),
        }
    }

    fn validation_failed() -> Self {
        Self::destructive(
            "Erro de validação",
            "Por favor, corrija os campos destacados antes de continuar.",
        )
    }

    fn processing_failed(description: impl Into<String>) -> Self {
        Self::destructive("Erro ao processar", description)
    }

    fn submission_in_flight() -> Self {
        Self::destructive(
            "Envio em andamento",
            "Sua análise já está sendo processada. Aguarde o redirecionamento.",
        )
    }

    fn analysis_completed() -> Self {
        Self {
            variant: NotificationVariant::Default,
            title: "Sucesso!".to_string(),
            description: "Análise concluída com sucesso. Redirecionando...".to_string(),
        }
    }
}

/// Result of a submit action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Analysis persisted; the visitor should be sent to the given path.
    Navigate(&'static str),
    /// Nothing persisted; the form stays editable.
    Rejected(Notification),
}

/// Submission failures, before they are turned into a notification.
#[derive(Debug, thiserror::Error)]
enum SubmissionFailure {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("{0}")]
    Upstream(String),
    #[error("Resposta da API inválida")]
    MissingEstimate,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to serialize questionnaire snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl SubmissionFailure {
    fn notification(&self) -> Notification {
        match self {
            SubmissionFailure::Gateway(GatewayError::Connect(_)) => {
                Notification::processing_failed(CONNECT_FAILURE_MESSAGE)
            }
            SubmissionFailure::Upstream(_) | SubmissionFailure::MissingEstimate => {
                Notification::processing_failed(self.to_string())
            }
            SubmissionFailure::Gateway(_)
            | SubmissionFailure::Store(_)
            | SubmissionFailure::Snapshot(_) => {
                Notification::processing_failed(GENERIC_FAILURE_MESSAGE)
            }
        }
    }
}

#[derive(Serialize)]
struct EligibilitySnapshot<'a> {
    #[serde(flatten)]
    form: &'a FarmIntakeForm,
    #[serde(rename = "isEligible")]
    is_eligible: bool,
}

/// Owns the questionnaire, its field errors, and touched flags for one visit.
#[derive(Debug, Clone)]
pub struct IntakeController {
    form: FarmIntakeForm,
    errors: ValidationErrors,
    touched: BTreeMap<IntakeField, bool>,
    phase: IntakePhase,
    notification: Option<Notification>,
}

impl Default for IntakeController {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeController {
    pub fn new() -> Self {
        Self {
            form: FarmIntakeForm::default(),
            errors: ValidationErrors::new(),
            touched: BTreeMap::new(),
            phase: IntakePhase::Editing,
            notification: None,
        }
    }

    /// Replay a posted questionnaire field by field, as if typed.
    ///
    /// A posted phone too long to reformat is kept as sent so validation can reject it.
    pub fn from_form(form: &FarmIntakeForm) -> Self {
        let mut controller = Self::new();
        for field in IntakeField::ALL {
            let value = form.value(field);
            if field == IntakeField::Phone && phone::format_for_display(value).is_none() {
                controller.form.set(field, value.to_string());
                controller.blur(field);
            } else {
                controller.change(field, value);
            }
        }
        controller
    }

    pub fn form(&self) -> &FarmIntakeForm {
        &self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn phase(&self) -> IntakePhase {
        self.phase
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn is_touched(&self, field: IntakeField) -> bool {
        self.touched.get(&field).copied().unwrap_or(false)
    }

    /// Error to surface next to a field: only touched fields show theirs.
    pub fn visible_error(&self, field: IntakeField) -> Option<&str> {
        if self.is_touched(field) {
            self.errors.get(&field).map(String::as_str)
        } else {
            None
        }
    }

    pub fn shows_cultivated_area_hint(&self) -> bool {
        shows_cultivated_area_hint(&self.form)
    }

    /// Submit control state: valid form and nothing in flight.
    pub fn can_submit(&self) -> bool {
        self.phase != IntakePhase::Submitting && is_form_valid(&self.form)
    }

    /// Apply an edit to one field and refresh only that field's error.
    ///
    /// Phone input is reformatted for display; an edit carrying more than eleven digits is
    /// ignored entirely.
    pub fn change(&mut self, field: IntakeField, value: &str) {
        let value = if field == IntakeField::Phone {
            match phone::format_for_display(value) {
                Some(formatted) => formatted,
                None => return,
            }
        } else {
            value.to_string()
        };

        self.form.set(field, value);
        self.touched.insert(field, true);
        self.refresh_error(field);
    }

    /// Focus left a field: mark it touched and re-check its current value.
    pub fn blur(&mut self, field: IntakeField) {
        self.touched.insert(field, true);
        self.refresh_error(field);
    }

    fn refresh_error(&mut self, field: IntakeField) {
        match validate_field(field, self.form.value(field), &self.form) {
            Some(message) => {
                self.errors.insert(field, message.to_string());
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    fn transition(&mut self, next: IntakePhase) {
        debug!(from = self.phase.label(), to = next.label(), "intake phase change");
        self.phase = next;
    }

    fn reject(&mut self, notification: Notification) -> SubmitOutcome {
        self.transition(IntakePhase::Error);
        self.notification = Some(notification.clone());
        self.transition(IntakePhase::Editing);
        SubmitOutcome::Rejected(notification)
    }

    /// Another submission for this visit is still running; keep the form and say so.
    pub fn reject_duplicate(&mut self) -> SubmitOutcome {
        info!("intake submission ignored while another is in flight");
        self.reject(Notification::submission_in_flight())
    }

    /// Validate, relay to the scoring service, and persist the answer on success.
    pub async fn submit<G, S>(&mut self, gateway: &G, store: &S) -> SubmitOutcome
    where
        G: AnalysisGateway + ?Sized,
        S: SessionStore + ?Sized,
    {
        self.transition(IntakePhase::Validating);
        self.notification = None;
        for field in IntakeField::ALL {
            self.touched.insert(field, true);
        }

        let intake = match ValidatedIntake::new(self.form.clone()) {
            Ok(intake) => {
                self.errors.clear();
                intake
            }
            Err(errors) => {
                info!(invalid_fields = errors.len(), "intake submission failed validation");
                self.errors = errors;
                return self.reject(Notification::validation_failed());
            }
        };

        self.transition(IntakePhase::Submitting);
        let request = FarmAnalysisRequest::from_intake(&intake);

        match self.relay(gateway, store, &request).await {
            Ok(()) => {
                self.transition(IntakePhase::Success);
                self.notification = Some(Notification::analysis_completed());
                info!(estado = %request.estado, "eligibility analysis stored");
                SubmitOutcome::Navigate(RESULTS_PATH)
            }
            Err(failure) => {
                warn!(error = %failure, "eligibility analysis failed");
                let notification = failure.notification();
                self.reject(notification)
            }
        }
    }

    async fn relay<G, S>(
        &self,
        gateway: &G,
        store: &S,
        request: &FarmAnalysisRequest,
    ) -> Result<(), SubmissionFailure>
    where
        G: AnalysisGateway + ?Sized,
        S: SessionStore + ?Sized,
    {
        let reply = gateway.submit(request).await?;

        if !reply.status.is_success() {
            return Err(SubmissionFailure::Upstream(upstream_failure_message(&reply)));
        }
        if !carries_estimate(&reply.body) {
            return Err(SubmissionFailure::MissingEstimate);
        }

        store.set(API_RESPONSE_KEY, serde_json::to_string(&reply.body)?)?;
        let snapshot = EligibilitySnapshot {
            form: &self.form,
            is_eligible: true,
        };
        store.set(ELIGIBILITY_DATA_KEY, serde_json::to_string(&snapshot)?)?;
        Ok(())
    }
}

/// Message for a non-success reply: the body's `message`, then its `error`, then a plain-text
/// body, then the bare status.
fn upstream_failure_message(reply: &ProxyReply) -> String {
    let non_empty = |value: Option<&Value>| {
        value
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    };

    let from_body = match &reply.body {
        Value::Object(map) => non_empty(map.get("message")).or_else(|| non_empty(map.get("error"))),
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    };

    from_body.unwrap_or_else(|| status_message(reply.status))
}

fn status_message(status: StatusCode) -> String {
    format!("Erro na API: {}", status.as_u16())
}
