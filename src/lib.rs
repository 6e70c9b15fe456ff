pub mod build_info;
pub mod commands;
pub mod error;
pub mod linker;
pub mod logging;
pub mod model;
pub mod output;
pub mod store;
