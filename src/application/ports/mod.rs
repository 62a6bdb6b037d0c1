mod asset_repository;
mod change_feed;
mod log_repository;
mod query_executor;
mod sale_repository;

pub use asset_repository::AssetRepository;
pub use change_feed::{ChangeFeed, FeedError, FeedMessage, FeedStream};
pub use log_repository::{LogQuery, LogRepository};
pub use query_executor::{QueryExecutor, RepositoryError};
pub use sale_repository::SaleRepository;

#[cfg(test)]
pub use asset_repository::MockAssetRepository;
#[cfg(test)]
pub use change_feed::MockChangeFeed;
#[cfg(test)]
pub use log_repository::MockLogRepository;
#[cfg(test)]
pub use query_executor::MockQueryExecutor;
#[cfg(test)]
pub use sale_repository::MockSaleRepository;
