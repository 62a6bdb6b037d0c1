//! Query construction engine.
//!
//! Request parameters are validated by [`args::FilterSchema`] first; the
//! filter composers then write conditions into a [`builder::QueryBuilder`]
//! and [`sort`] appends the ordering and paging tail.

pub mod args;
pub mod asset_filter;
pub mod attribute;
pub mod boundary;
pub mod builder;
pub mod greylist;
pub mod list;
pub mod mint;
pub mod sale_filter;
pub mod sort;

pub use args::{ArgSpec, ArgValue, ArgumentError, FilterArgs, FilterSchema, RequestParams};
pub use attribute::AttributeFilter;
pub use builder::{QueryBuilder, SqlValue};
pub use list::ListQuery;
pub use sort::SortDescriptor;
