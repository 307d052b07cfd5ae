pub mod build;
pub mod catalog;
pub mod config;
pub mod market;
pub mod review;
pub mod user;
pub mod wishlist;

pub use build::BuildCommand;
pub use catalog::CatalogCommand;
pub use config::ConfigCommand;
pub use market::MarketCommand;
pub use review::ReviewCommand;
pub use user::UserCommand;
pub use wishlist::WishlistCommand;
