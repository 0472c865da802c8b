pub mod config;
pub mod error;
pub mod logger;
pub mod delay_manager;
pub mod search_engine;
pub mod fetcher;
pub mod normalizer;
pub mod extractor;
pub mod harvester;
pub mod corpus_writer;

// Exporting types for convenience
pub use config::HarvestConfig;
pub use error::{ConfigError, DiscoveryError, FetchError, PersistenceError};
pub use extractor::{PageExtractor, ScrapeRecord};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use harvester::{HarvestController, HarvestOutcome, HarvestReport, HarvestState};
pub use normalizer::Normalizer;
pub use search_engine::{DuckDuckGo, SearchProvider};
