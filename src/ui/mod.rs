pub mod app;
pub mod input;
pub mod render;
pub mod report;

pub use app::*;
pub use input::*;
pub use report::*;
