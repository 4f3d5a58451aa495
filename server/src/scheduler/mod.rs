mod pricing;
pub(crate) use pricing::price_update;

mod scheduler;
pub use scheduler::DrainReport;
pub(crate) use scheduler::{enqueue_task, Scheduler};
