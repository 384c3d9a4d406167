pub mod store;
pub mod task;

pub use store::{next_id, Store};
pub use task::Task;
