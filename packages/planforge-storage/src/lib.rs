pub mod conversations;
pub mod db;
pub mod feedback;
pub mod messages;
pub mod models;
pub mod plans;
pub mod preferences;
pub mod schema;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Hard cap applied to every list query; there is no pagination cursor.
pub const LIST_CAP: i64 = 1_000;
