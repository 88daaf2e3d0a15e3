//! Farm eligibility questionnaire: field validation, payload normalization, the intake
//! controller, and the session-scoped store that hands results to the results page.

pub mod controller;
pub mod domain;
pub mod normalizer;
pub mod phone;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use controller::{
    IntakeController, IntakePhase, Notification, NotificationVariant, SubmitOutcome, RESULTS_PATH,
};
pub use domain::{
    parse_hectares, state_name, FarmIntakeForm, IntakeField, BRAZILIAN_STATES, NATIVE_AREA_NO,
    NATIVE_AREA_YES, SOIL_TYPES,
};
pub use normalizer::FarmAnalysisRequest;
pub use store::{
    InMemorySessionStore, SessionStore, StoreError, API_RESPONSE_KEY, ELIGIBILITY_DATA_KEY,
};
pub use validation::{
    is_form_valid, validate_field, validate_form, ValidatedIntake, ValidationErrors,
    CULTIVATED_AREA_HINT, MINIMUM_CULTIVATED_HECTARES,
};
