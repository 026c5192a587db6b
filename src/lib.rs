pub mod aggregate;
pub mod category;
pub mod config;
pub mod display;
pub mod export;
pub mod filter;
pub mod http_client;
pub mod loader;
pub mod logging;
pub mod normalize;
pub mod payload;
pub mod source;
pub mod state;
pub mod team;
pub mod team_resolve;
