//! Market-map source implementations.
//!
//! Each provider module supplies [`MarketMapApiHandler`](crate::fetcher::MarketMapApiHandler)s
//! for its documents. Transport, cancellation and coverage are handled by
//! [`RestApiFetcher`](crate::fetcher::RestApiFetcher), so providers only build
//! URLs and convert bodies.

pub mod perpx;
