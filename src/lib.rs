//! Fuzzy full-text search over a personal book collection.
//!
//! An embedded, in-process search engine: four inverted indices (title,
//! author, subject tokens plus whole-string ISBNs) over normalized text,
//! a tiered fuzzy matcher (exact / prefix / substring / edit-distance), and
//! an async coordinator that keeps the index in sync with whatever canonical
//! record store the host application uses.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌────────────────┐
//! │ normalize.rs │────▶│   index.rs   │◀────│ coordinator.rs │
//! │ (tokenizing) │     │ (SearchIndex)│     │ (rebuild/sync) │
//! └──────────────┘     └──────────────┘     └────────────────┘
//!        │                    │                      │
//!        ▼                    ▼                      ▼
//! ┌──────────────┐     ┌──────────────┐     ┌────────────────┐
//! │   fuzzy.rs   │     │   types.rs   │     │  metadata.rs   │
//! │ (token_score)│     │ (records,    │     │ (freshness     │
//! │ levenshtein  │     │  hits, kinds)│     │  persistence)  │
//! └──────────────┘     └──────────────┘     └────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use octavo::{IndexMetadataStore, MemoryBookStore, SearchCoordinator};
//!
//! let store = MemoryBookStore::from_records(records);
//! let mut coordinator = SearchCoordinator::with_default_metadata_store();
//! coordinator.rebuild_index(&store).await?;
//!
//! for result in coordinator.search("gatsby", &store).await? {
//!     println!("{} ({:.0})", result.record.title, result.score);
//! }
//! ```

pub mod coordinator;
pub mod fuzzy;
pub mod index;
pub mod levenshtein;
pub mod metadata;
pub mod normalize;
pub mod store;
pub mod types;

pub use coordinator::{IndexingStatus, SearchCoordinator};
pub use fuzzy::token_score;
pub use index::{SearchIndex, ISBN_MATCH_SCORE};
pub use levenshtein::distance;
pub use metadata::IndexMetadataStore;
pub use normalize::normalize;
pub use store::{BookStore, MemoryBookStore};
pub use types::{
    BookRecord, IndexMetadata, IndexStats, MatchKind, SearchHit, SearchResult, METADATA_VERSION,
};
