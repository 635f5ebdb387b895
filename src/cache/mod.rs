// Cache module for local filesystem caching.
// Persists store-backed game records between runs to avoid refetching.

pub mod paths;
pub mod store;

pub use paths::games_path;
pub use store::{load, store};
