pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod state;
pub mod storage;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use ledger::Ledger;
pub use state::AppState;
pub use storage::{load_data, JsonFileStore, MemoryStore, Store};
pub use tracker::Tracker;
