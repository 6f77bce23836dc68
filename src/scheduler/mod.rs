//! Animation timing: frame sources, speed steps and the generation scheduler

pub mod animation;
pub mod frame;
pub mod speed;

pub use animation::{AnimationScheduler, SchedulerState, DEFAULT_MAX_CATCH_UP_STEPS};
pub use frame::{Frame, FrameHandle, FrameSource, IntervalFrameSource, ManualFrameSource};
pub use speed::{SpeedStep, SpeedTable};
