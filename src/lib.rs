pub mod api;
pub mod server;
pub mod services;
pub mod utils;
