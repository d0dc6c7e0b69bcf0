//! Vehicle catalog: spreadsheet ingestion, cascading option lists and
//! on-road price lookup.
//!
//! Nothing in here fails. Malformed rows are dropped during ingestion and
//! lookups that miss degrade to empty lists or a zero price.

pub mod ingest;
pub mod resolver;
pub mod selection;
pub mod shared;

pub use ingest::{ingest, ingest_with_summary, IngestSummary};
pub use resolver::{Catalog, CatalogEntry};
pub use selection::{ResolvedSelection, Selection, SelectionStage};
pub use shared::SharedCatalog;
