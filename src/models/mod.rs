pub mod outcome;
pub mod product;

pub use outcome::{ExportReport, ScrapeOutcome};
pub use product::{Field, ProductRecord};
