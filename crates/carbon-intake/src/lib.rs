//! Eligibility intake pipeline for the farm carbon-credit financing site.
//!
//! The pipeline validates the farmer's questionnaire, normalizes it into the scoring service's
//! request shape, relays it through a same-origin proxy, persists the raw answer in a
//! session-scoped store, and renders the estimate on the results page.

pub mod config;
pub mod error;
pub mod markup;
pub mod telemetry;
pub mod workflows;
