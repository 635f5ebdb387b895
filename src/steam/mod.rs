// Steam module.
// Web API client, storefront metadata fetcher, and the library enumerator.

pub mod api;
pub mod library;
pub mod storefront;
pub mod types;

pub use api::SteamUser;
pub use library::SteamLibrary;
pub use storefront::Storefront;
