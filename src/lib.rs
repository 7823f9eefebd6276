pub mod assessment;
pub mod config;
pub mod constants;
pub mod extractors;
pub mod gap;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
