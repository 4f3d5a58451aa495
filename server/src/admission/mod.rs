mod budget_frame;
pub use budget_frame::{BudgetFrame, TickBudget};

mod admission_controller;
pub use admission_controller::{admit, Admission, EMERGENCY_PRIORITY_FLOOR};

mod chunk_order;
pub use chunk_order::{chunk_order, ChunkOrder};
