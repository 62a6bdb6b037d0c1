use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::api::handlers::LiveStatus;
use crate::api::router::AppState;
use crate::application::{
    filler::ResultFiller,
    notifications::{
        AssetEventHandler, ChannelHandle, ConnectionAdmission, NotificationChannel,
        SaleEventHandler, SocketNamespace,
    },
    ports::{AssetRepository, ChangeFeed, LogRepository, QueryExecutor, SaleRepository},
    use_cases::{
        AssetStatsUseCase, EntityLogsUseCase, GetAssetUseCase, GetSaleUseCase, ListAssetsUseCase,
        ListSalesUseCase, SaleTemplatesUseCase, SALE_ACTIONS,
    },
};
use crate::config::{ChangeFeedKind, Config};
use crate::domain::value_objects::ChannelTopic;
use crate::infrastructure::{
    persistence::{
        PgQueryExecutor, PostgresAssetRepository, PostgresLogRepository, PostgresSaleRepository,
    },
    pubsub::{MemoryChangeFeed, PgNotifyFeed},
};

type BuildError = Box<dyn std::error::Error + Send + Sync>;

/// Application builder for clean dependency injection and setup
pub struct ApplicationBuilder {
    config: Config,
    pool: Option<PgPool>,
    executor: Option<Arc<dyn QueryExecutor>>,
    asset_repo: Option<Arc<dyn AssetRepository>>,
    sale_repo: Option<Arc<dyn SaleRepository>>,
    log_repo: Option<Arc<dyn LogRepository>>,
    change_feed: Option<Arc<dyn ChangeFeed>>,
}

impl ApplicationBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pool: None,
            executor: None,
            asset_repo: None,
            sale_repo: None,
            log_repo: None,
            change_feed: None,
        }
    }

    /// Initialize database connection pool with retry logic
    pub async fn with_database(mut self) -> Result<Self, BuildError> {
        info!("Connecting to database");

        let mut retries = 3;
        let mut delay = Duration::from_secs(1);
        let pool = loop {
            match PgPoolOptions::new()
                .max_connections(self.config.db_max_connections)
                .min_connections(self.config.db_min_connections)
                .acquire_timeout(Duration::from_secs(self.config.db_acquire_timeout_secs))
                .idle_timeout(Some(Duration::from_secs(self.config.db_idle_timeout_secs)))
                .max_lifetime(Some(Duration::from_secs(self.config.db_max_lifetime_secs)))
                .connect(&self.config.database_url)
                .await
            {
                Ok(pool) => break pool,
                Err(e) if retries > 0 => {
                    retries -= 1;
                    tracing::warn!(
                        "Database connection failed, retrying in {:?} ({} retries left): {}",
                        delay,
                        retries,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    tracing::error!("Failed to connect to database after retries: {}", e);
                    return Err(Box::new(e));
                }
            }
        };

        info!(
            "Database pool configured: max={}, min={}, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
            self.config.db_max_connections,
            self.config.db_min_connections,
            self.config.db_acquire_timeout_secs,
            self.config.db_idle_timeout_secs,
            self.config.db_max_lifetime_secs
        );

        self.pool = Some(pool);
        Ok(self)
    }

    /// Use an already connected pool
    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Replace the configured change feed
    pub fn with_change_feed(mut self, feed: Arc<dyn ChangeFeed>) -> Self {
        self.change_feed = Some(feed);
        self
    }

    /// Initialize infrastructure layer (repositories and change feed)
    pub fn with_infrastructure(mut self) -> Result<Self, BuildError> {
        let pool = self.pool.as_ref().ok_or("Database pool not initialized")?;

        self.executor = Some(Arc::new(PgQueryExecutor::new(pool.clone())));
        self.asset_repo = Some(Arc::new(PostgresAssetRepository::new(pool.clone())));
        self.sale_repo = Some(Arc::new(PostgresSaleRepository::new(pool.clone())));
        self.log_repo = Some(Arc::new(PostgresLogRepository::new(pool.clone())));

        if self.change_feed.is_none() {
            let feed: Arc<dyn ChangeFeed> = match self.config.change_feed_kind()? {
                ChangeFeedKind::Postgres => Arc::new(PgNotifyFeed::new(pool.clone())),
                ChangeFeedKind::Memory => Arc::new(MemoryChangeFeed::new()),
            };
            self.change_feed = Some(feed);
        }

        info!(change_feed = %self.config.change_feed, "Infrastructure layer initialized");
        Ok(self)
    }

    /// Wire use cases, start one notification channel per resource and
    /// build the application state.
    pub async fn build(self) -> Result<AppState, BuildError> {
        let pool = self.pool.ok_or("Database pool not initialized")?;
        let executor = self.executor.ok_or("Query executor not initialized")?;
        let asset_repo = self.asset_repo.ok_or("Asset repository not initialized")?;
        let sale_repo = self.sale_repo.ok_or("Sale repository not initialized")?;
        let log_repo = self.log_repo.ok_or("Log repository not initialized")?;
        let change_feed = self.change_feed.ok_or("Change feed not initialized")?;
        let config = self.config;

        let filler = Arc::new(ResultFiller::new(
            Arc::clone(&asset_repo),
            sale_repo,
            config.atomicassets_account.clone(),
            config.atomicmarket_account.clone(),
        ));

        let max_limit = config.api_max_limit;
        let list_assets = Arc::new(ListAssetsUseCase::new(
            Arc::clone(&executor),
            Arc::clone(&filler),
            max_limit,
        ));
        let get_asset = Arc::new(GetAssetUseCase::new(Arc::clone(&filler)));
        let asset_stats = Arc::new(AssetStatsUseCase::new(
            Arc::clone(&asset_repo),
            config.atomicassets_account.clone(),
        ));
        let asset_logs = Arc::new(EntityLogsUseCase::new(
            Arc::clone(&log_repo),
            config.atomicassets_account.clone(),
            "asset",
            None,
        ));
        let list_sales = Arc::new(ListSalesUseCase::new(
            Arc::clone(&executor),
            Arc::clone(&filler),
            max_limit,
        ));
        let sale_templates = Arc::new(SaleTemplatesUseCase::new(
            executor,
            Arc::clone(&filler),
            max_limit,
        ));
        let get_sale = Arc::new(GetSaleUseCase::new(Arc::clone(&filler)));
        let sale_logs = Arc::new(EntityLogsUseCase::new(
            log_repo,
            config.atomicmarket_account.clone(),
            "sale",
            Some(SALE_ACTIONS),
        ));

        info!("Application layer initialized");

        let admission = || {
            ConnectionAdmission::new(
                config.socket_max_connections,
                config.socket_max_connections_per_ip,
            )
        };
        let asset_sockets = SocketNamespace::new("/v1/assets", admission());
        let sale_sockets = SocketNamespace::new("/v1/sales", admission());

        let reader = config.connected_reader.as_str();
        let fork_topic = ChannelTopic::fork(reader)?;

        let asset_channel = NotificationChannel::new(
            ChannelTopic::resource(reader, &config.atomicassets_account, "assets")?,
            fork_topic.clone(),
            Arc::clone(&asset_sockets),
            Arc::new(AssetEventHandler::new(
                asset_repo,
                config.atomicassets_account.clone(),
            )),
            config.notification_queue_capacity,
        );
        let sale_channel = NotificationChannel::new(
            ChannelTopic::resource(reader, &config.atomicmarket_account, "sales")?,
            fork_topic,
            Arc::clone(&sale_sockets),
            Arc::new(SaleEventHandler::new(filler)),
            config.notification_queue_capacity,
        );

        let channels: Vec<ChannelHandle> = vec![
            asset_channel.start(change_feed.as_ref()).await?,
            sale_channel.start(change_feed.as_ref()).await?,
        ];

        info!(
            chain = %config.chain_name,
            reader = %config.connected_reader,
            channels = channels.len(),
            "Notification channels started"
        );

        let live = Arc::new(LiveStatus {
            channels,
            namespaces: vec![Arc::clone(&asset_sockets), Arc::clone(&sale_sockets)],
        });

        Ok(AppState {
            pool: Arc::new(pool),
            list_assets,
            get_asset,
            asset_stats,
            asset_logs,
            list_sales,
            sale_templates,
            get_sale,
            sale_logs,
            asset_sockets,
            sale_sockets,
            live,
            allowed_origins: config.allowed_origins,
        })
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
