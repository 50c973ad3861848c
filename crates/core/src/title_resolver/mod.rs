//! Resolution of external content identifiers into canonical titles.
//!
//! The search cascade only needs `{original title, russian title, year}` for
//! an id; where those come from is behind the [`TitleResolver`] trait. The
//! bundled implementation queries TMDB.

mod tmdb;
mod types;

pub use tmdb::TmdbResolver;
pub use types::*;

use async_trait::async_trait;

use crate::searcher::ContentType;

/// Trait for identifier-to-title resolution services.
#[async_trait]
pub trait TitleResolver: Send + Sync {
    /// Resolver name for logging.
    fn name(&self) -> &str;

    /// Resolve an identifier for the given kind of content.
    async fn resolve(
        &self,
        id: &ExternalId,
        kind: ContentType,
    ) -> Result<ResolvedTitle, ResolveError>;
}
