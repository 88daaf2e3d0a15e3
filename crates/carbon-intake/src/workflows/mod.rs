pub mod eligibility;
pub mod results;
pub mod scoring;
