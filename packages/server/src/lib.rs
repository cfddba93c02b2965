// Grow Advisor - core library
//
// Turns an uploaded CSV of grow-room readings plus a growth stage into a
// validated set of recommendations produced by a remote LLM.
//
// domains/  - analysis core (digest, prompts, validation, orchestration) and the product catalog
// kernel/   - completion-service trait, its OpenAI-backed implementation, shared deps, mocks
// server/   - axum routes, templates and static assets

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
