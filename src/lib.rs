// Library surface shared by the binary and the integration tests.
pub mod app;
pub mod app_dirs;
pub mod arena;
pub mod config;
pub mod countdown;
pub mod device;
pub mod error;
pub mod history;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod terminal;
pub mod ui;
pub mod util;
