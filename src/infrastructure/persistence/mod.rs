mod executor;
mod postgres_asset_repository;
mod postgres_log_repository;
mod postgres_sale_repository;

pub use executor::PgQueryExecutor;
pub use postgres_asset_repository::PostgresAssetRepository;
pub use postgres_log_repository::PostgresLogRepository;
pub use postgres_sale_repository::PostgresSaleRepository;
