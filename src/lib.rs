//! Serverless-style HTTP relay: a structured translation endpoint backed by an
//! OpenAI-compatible LLM, and a contact-form pass-through.

pub mod config;
pub mod contact;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod llm;
pub mod routes;
pub mod state;
pub mod translate;
