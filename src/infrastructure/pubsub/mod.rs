mod memory_feed;
mod pg_notify_feed;

pub use memory_feed::MemoryChangeFeed;
pub use pg_notify_feed::PgNotifyFeed;
