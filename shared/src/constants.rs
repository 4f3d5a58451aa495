use crate::types::Priority;

/// Width of a chunk along the x and z axes, in blocks
pub const CHUNK_SIZE: i32 = 16;
/// Duration of a healthy server tick at 20 ticks per second
pub const TARGET_TICK_MS: f64 = 20.0;
/// Ticks slower than this are counted as warning ticks
pub const SLOW_TICK_MS: f64 = 40.0;
/// Ticks slower than this are counted as critical ticks
pub const CRITICAL_TICK_MS: f64 = 80.0;
/// Fluid above this height with nothing below it is a floating layer
pub const FLOATING_LAYER_MIN_Y: i32 = 60;
/// Upper bound of any computed update priority
pub const MAX_PRIORITY: Priority = 300;
