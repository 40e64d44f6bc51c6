pub mod app_config;
pub mod job_config;
pub mod selector_config;

pub use app_config::*;
pub use job_config::{JobSpec, default_jobs};
pub use selector_config::{FieldSelectors, SelectorConfig};
