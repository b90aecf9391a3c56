pub mod config;
pub mod debounce;
pub mod error;
pub mod facets;
pub mod pipeline;
pub mod search;
pub mod server;
