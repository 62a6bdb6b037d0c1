mod action_log;
mod asset;
mod change_event;
mod sale;

pub use action_log::ActionLog;
pub use asset::Asset;
pub use change_event::{BlockRef, ChangeEvent, ForkEvent, TransactionRef};
pub use sale::Sale;
