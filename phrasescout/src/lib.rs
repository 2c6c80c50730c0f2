pub mod config;
pub mod corpus;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod results;
pub mod scheduler;
pub mod search;

pub use config::SearchConfig;
pub use corpus::{load_corpus, load_phrases, Document, PhraseSet};
pub use errors::{SearchError, SearchResult};
pub use results::{DocumentResult, MatchResult, SearchOutcome};
pub use scheduler::{Scheduler, WorkerId};
pub use search::{search, SearchEngine};
