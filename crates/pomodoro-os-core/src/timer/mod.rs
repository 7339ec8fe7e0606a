mod clock;
mod engine;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineSnapshot, SessionEngine};
pub use ticker::{ManualTicker, TickHandle, TickScheduler, TokioTicker};
