pub mod app_data;
pub mod completion;
pub mod config;
pub mod range;
pub mod task;

pub use app_data::*;
pub use completion::*;
pub use config::*;
pub use range::*;
pub use task::*;
