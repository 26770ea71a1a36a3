// Cover letter and email generation.
// All completion calls go through llm_client; no direct HTTP calls here.

pub mod builder;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod sanitizer;
pub mod tone;
