// Interview session engine: session state, the per-turn pipeline, the
// termination policy and the coverage report. Collaborators are reached only
// through the traits in `collaborators`; concrete backends live in `analysis`.

pub mod collaborators;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod keyword_detector;
pub mod models;
pub mod report;
pub mod store;
pub mod validation;
