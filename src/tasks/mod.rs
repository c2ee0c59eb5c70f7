pub mod model;
pub mod store;

pub use model::{Priority, PriorityDirection, Task, TaskId};
pub use store::TaskStore;
