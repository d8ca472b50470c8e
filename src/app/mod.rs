pub mod context;
pub mod error;
pub mod signal;

pub use context::AppContext;
pub use error::{NewsError, Result};
pub use signal::Signal;
