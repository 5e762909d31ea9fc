//! Testing utilities for the Wayfarer workspace
//!
//! Shared generator fakes, context fakes, and session fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use wayfarer_core::RelationKind;
use wayfarer_session::{
    ContentGenerator, ContextLookup, ExpansionRequest, GenerateError, GeneratedTopic, LookupError,
    MapSession, SessionConfig,
};

/// Deterministic generator: the seed topic echoes the query, and each
/// expansion derives its label from the focus title and kind. Labels
/// are unique per `(focus, kind)`, so navigation tests can find the
/// node they expect by title.
#[derive(Debug, Default)]
pub struct ScriptedGenerator;

pub fn topic_label(focus_title: &str, kind: RelationKind) -> String {
    format!("{focus_title} ({kind})")
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn seed_topic(
        &self,
        query: &str,
        _snippets: &[String],
    ) -> Result<GeneratedTopic, GenerateError> {
        Ok(GeneratedTopic::new(query, format!("Overview of {query}.")))
    }

    async fn expand_topic(&self, req: ExpansionRequest) -> Result<GeneratedTopic, GenerateError> {
        Ok(GeneratedTopic::new(
            topic_label(&req.topic_title, req.kind),
            format!("Depth {} expansion of {}.", req.depth, req.topic_title),
        ))
    }
}

/// Fails expansion for one relationship kind with a fixed error,
/// behaves like [`ScriptedGenerator`] everywhere else.
#[derive(Debug)]
pub struct FailingKindGenerator {
    pub kind: RelationKind,
    pub error: GenerateError,
}

impl FailingKindGenerator {
    pub fn new(kind: RelationKind, error: GenerateError) -> Self {
        Self { kind, error }
    }
}

#[async_trait]
impl ContentGenerator for FailingKindGenerator {
    async fn seed_topic(
        &self,
        query: &str,
        snippets: &[String],
    ) -> Result<GeneratedTopic, GenerateError> {
        ScriptedGenerator.seed_topic(query, snippets).await
    }

    async fn expand_topic(&self, req: ExpansionRequest) -> Result<GeneratedTopic, GenerateError> {
        if req.kind == self.kind {
            return Err(self.error.clone());
        }
        ScriptedGenerator.expand_topic(req).await
    }
}

/// Delays every call by a fixed duration before delegating to
/// [`ScriptedGenerator`]. Timeout tests pair this with a short
/// `generation_timeout`.
#[derive(Debug)]
pub struct SlowGenerator {
    pub delay: Duration,
}

impl SlowGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ContentGenerator for SlowGenerator {
    async fn seed_topic(
        &self,
        query: &str,
        snippets: &[String],
    ) -> Result<GeneratedTopic, GenerateError> {
        tokio::time::sleep(self.delay).await;
        ScriptedGenerator.seed_topic(query, snippets).await
    }

    async fn expand_topic(&self, req: ExpansionRequest) -> Result<GeneratedTopic, GenerateError> {
        tokio::time::sleep(self.delay).await;
        ScriptedGenerator.expand_topic(req).await
    }
}

/// Wraps another generator and records every expansion request, for
/// asserting which slots were (and were not) generated.
pub struct RecordingGenerator {
    inner: Arc<dyn ContentGenerator>,
    expansions: Mutex<Vec<ExpansionRequest>>,
}

impl RecordingGenerator {
    pub fn new(inner: Arc<dyn ContentGenerator>) -> Self {
        Self {
            inner,
            expansions: Mutex::new(Vec::new()),
        }
    }

    pub fn scripted() -> Self {
        Self::new(Arc::new(ScriptedGenerator))
    }

    /// Requests seen so far, in arrival order.
    pub fn expansions(&self) -> Vec<ExpansionRequest> {
        self.expansions.lock().clone()
    }

    pub fn expansion_count(&self) -> usize {
        self.expansions.lock().len()
    }
}

#[async_trait]
impl ContentGenerator for RecordingGenerator {
    async fn seed_topic(
        &self,
        query: &str,
        snippets: &[String],
    ) -> Result<GeneratedTopic, GenerateError> {
        self.inner.seed_topic(query, snippets).await
    }

    async fn expand_topic(&self, req: ExpansionRequest) -> Result<GeneratedTopic, GenerateError> {
        self.expansions.lock().push(req.clone());
        self.inner.expand_topic(req).await
    }
}

/// Context lookup returning a fixed snippet list for every query.
#[derive(Debug, Default)]
pub struct StaticContext {
    pub snippets: Vec<String>,
}

impl StaticContext {
    pub fn new(snippets: Vec<String>) -> Self {
        Self { snippets }
    }
}

#[async_trait]
impl ContextLookup for StaticContext {
    async fn lookup(&self, _query: &str) -> Result<Vec<String>, LookupError> {
        Ok(self.snippets.clone())
    }
}

/// Context lookup that always fails. Sessions must degrade to an empty
/// snippet list rather than surface this.
#[derive(Debug, Default)]
pub struct FailingContext;

#[async_trait]
impl ContextLookup for FailingContext {
    async fn lookup(&self, _query: &str) -> Result<Vec<String>, LookupError> {
        Err(LookupError::Failed("context backend offline".to_string()))
    }
}

/// Session over a [`ScriptedGenerator`] and an empty [`StaticContext`],
/// with default configuration.
pub fn setup_test_session() -> MapSession {
    setup_session_with(Arc::new(ScriptedGenerator), SessionConfig::new())
}

/// Session over an arbitrary generator, with an empty context.
pub fn setup_session_with(
    generator: Arc<dyn ContentGenerator>,
    config: SessionConfig,
) -> MapSession {
    MapSession::new(generator, Arc::new(StaticContext::default()), config)
}
