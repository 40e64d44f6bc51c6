pub mod cascade;
pub mod origin;
pub mod product_extractor;

pub use cascade::{Locator, first_match, visible_text};
pub use origin::{OriginResolver, PageUrlResolver, VendorMarkerResolver, resolver_from_config};
pub use product_extractor::ProductExtractor;
