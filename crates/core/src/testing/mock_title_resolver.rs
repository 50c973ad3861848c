//! Mock title resolver for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::searcher::ContentType;
use crate::title_resolver::{ExternalId, ResolveError, ResolvedTitle, TitleResolver};

/// Mock implementation of the TitleResolver trait.
///
/// Titles are keyed by the identifier's display form (`tt…` / `kp…`).
/// Unknown identifiers resolve to [`ResolveError::NotFound`].
#[derive(Debug)]
pub struct MockTitleResolver {
    titles: Arc<RwLock<HashMap<String, ResolvedTitle>>>,
    /// Recorded lookups.
    lookups: Arc<RwLock<Vec<(ExternalId, ContentType)>>>,
    /// If set, the next lookup will fail with this error.
    next_error: Arc<RwLock<Option<ResolveError>>>,
}

impl Default for MockTitleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTitleResolver {
    pub fn new() -> Self {
        Self {
            titles: Arc::new(RwLock::new(HashMap::new())),
            lookups: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Register a title for an identifier such as `"tt0133093"`.
    pub async fn add_title(&self, id: &str, title: ResolvedTitle) {
        self.titles
            .write()
            .await
            .insert(id.trim().to_ascii_lowercase(), title);
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: ResolveError) {
        *self.next_error.write().await = Some(error);
    }

    /// Recorded lookups.
    pub async fn lookups(&self) -> Vec<(ExternalId, ContentType)> {
        self.lookups.read().await.clone()
    }

    pub async fn resolve_count(&self) -> usize {
        self.lookups.read().await.len()
    }
}

#[async_trait]
impl TitleResolver for MockTitleResolver {
    fn name(&self) -> &str {
        "mock"
    }

    async fn resolve(
        &self,
        id: &ExternalId,
        kind: ContentType,
    ) -> Result<ResolvedTitle, ResolveError> {
        self.lookups.write().await.push((id.clone(), kind));

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        self.titles
            .read()
            .await
            .get(&id.to_string())
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(id.to_string()))
    }
}
