pub mod config;
pub mod fetch;
pub mod logging;
pub mod scan;
pub mod template;
pub mod version;
