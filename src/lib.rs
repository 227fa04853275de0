pub mod api_router;
pub mod automation;
pub mod config;
pub mod dashboard;
pub mod leads;
pub mod server;
pub mod shared;
