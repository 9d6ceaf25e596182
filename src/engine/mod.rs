pub mod sequencer;
pub mod messages;
pub mod poller;
pub mod commands;

pub use sequencer::*;
pub use messages::*;
pub use poller::*;
pub use commands::*;
