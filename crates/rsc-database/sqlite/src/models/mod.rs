pub mod content;
pub mod crawl_log;
pub mod mention;
pub mod stats;
pub mod ticker;
