//! Services for loading, grouping and rendering listings

pub mod aggregator;
pub mod data_loader;
pub mod fetcher;
pub mod html;
pub mod novelty;
pub mod report;

pub use aggregator::Aggregator;
pub use data_loader::{DataLoaderService, LoadResult};
pub use fetcher::FeedSource;
