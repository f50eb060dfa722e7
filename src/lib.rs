pub mod config;
pub mod error;
pub mod logger;
pub mod semester;
pub mod transport;
pub mod session;
pub mod extractor;
pub mod search_result;
pub mod paginator;
pub mod detail_pool;
pub mod output;
pub mod runner;

// Exporting types for convenience
pub use config::Config;
pub use error::SearchError;
pub use semester::{Query, Semester, SemesterKind};
pub use transport::{HttpTransport, Transport};
pub use session::{FlowSession, PageRequest};
pub use extractor::ResultExtractor;
pub use search_result::{CourseDetails, SearchResult};
pub use paginator::collect_results;
pub use detail_pool::DetailPool;
pub use runner::{search, SearchOutcome};
