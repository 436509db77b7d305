//! Multi-source aggregation.
//!
//! - [`MultiMarketMapFetcher`]: concurrent primary/secondary fetch, merge and validation
//! - [`merge_market_maps`]: primary-wins union of two market maps
//! - [`ReferenceFilter`]: narrows a merged map to a single reference provider

mod merge;
mod multi;
mod reference_filter;

pub use merge::merge_market_maps;
pub use multi::MultiMarketMapFetcher;
pub use reference_filter::ReferenceFilter;
