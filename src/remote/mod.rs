pub mod fetcher;
pub mod server;
pub mod tracker;
