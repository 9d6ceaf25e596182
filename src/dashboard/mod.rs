pub mod metrics;
pub mod status;
pub mod feeds;
pub mod chart;
pub mod settings_form;
pub mod navigation;
pub mod toast;
pub mod state;

pub use metrics::*;
pub use status::*;
pub use feeds::*;
pub use chart::*;
pub use settings_form::*;
pub use navigation::*;
pub use toast::*;
pub use state::*;
