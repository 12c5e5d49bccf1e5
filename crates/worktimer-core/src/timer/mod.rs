//! Timer state machine over the project log and the shared status slot.

mod engine;
mod replay;
mod state;

pub use engine::TimerEngine;
pub use replay::recompute_work_done;
pub use state::TimerState;
