pub mod catalog;
pub mod enrichment;
pub mod provider;

pub use catalog::{CatalogError, CatalogService};
pub use enrichment::{EnrichedRecord, Enricher, PosterRef};
pub use provider::MediaProvider;
