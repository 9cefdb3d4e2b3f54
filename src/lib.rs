pub mod browser;
pub mod config;
pub mod events;
pub mod fs;
pub mod ids;
pub mod issues;
pub mod paths;
pub mod providers;
pub mod store;
pub mod stores;
