pub mod config;
pub mod detect;
pub mod metrics;
pub mod orchestrator;
pub mod searcher;
pub mod testing;
pub mod title_resolver;
pub mod view;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use orchestrator::{OrchestratorError, SearchOptions, SearchOrchestrator, TitleTarget};
pub use searcher::{
    ContentType, Quality, RedApiSearcher, SearchError, SearchQuery, Searcher, TorrentRecord,
};
pub use title_resolver::{
    ExternalId, ResolveError, ResolvedTitle, TitleResolver, TmdbResolver,
};
pub use view::{
    filter_by_quality, group_by_quality, group_by_season, sort, QualityFilter, SortField,
    SortOrder,
};
