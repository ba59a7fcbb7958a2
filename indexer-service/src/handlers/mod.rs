pub mod health;
pub mod metrics;
pub mod upload;

pub use health::{not_found, ping};
pub use self::metrics::metrics;
pub use upload::upload;
