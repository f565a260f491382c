//! Integration Tests Module
//!
//! End-to-end tests for agent-stack: builder graphs through extraction,
//! the chat service over a JSON directory store, and backend failure
//! handling through the real registries.

// Shared test doubles
mod support;

// Builder graph extraction tests
mod extraction_test;

// Chat service over the JSON directory store
mod chat_flow_test;

// Real backend/tool registries without network access
mod registry_test;
