pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod reminder;
pub mod rewards;
pub mod storage;
pub mod task_api;
