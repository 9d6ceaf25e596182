pub mod time;
pub mod status;
pub mod portfolio;
pub mod trade;
pub mod signal;
pub mod settings;

pub use time::*;
pub use status::*;
pub use portfolio::*;
pub use trade::*;
pub use signal::*;
pub use settings::*;
