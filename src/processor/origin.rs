use std::sync::Arc;
use url::Url;

use crate::config::{OriginConfig, OriginStrategy, VendorOrigin};

/// Turns a scraped link or image reference into an absolute URL where possible.
///
/// Values that cannot be resolved are returned unchanged.
pub trait OriginResolver: Send + Sync {
    fn resolve(&self, value: &str, block_html: &str, page_url: Option<&str>) -> String;
}

/// Standard URL join against the page the block came from
#[derive(Debug, Clone, Copy, Default)]
pub struct PageUrlResolver;

impl OriginResolver for PageUrlResolver {
    fn resolve(&self, value: &str, _block_html: &str, page_url: Option<&str>) -> String {
        let Some(base) = page_url.and_then(|u| Url::parse(u).ok()) else {
            return value.to_string();
        };

        match base.join(value) {
            Ok(joined) => joined.to_string(),
            Err(_) => value.to_string(),
        }
    }
}

/// Root-relative paths get the origin of the first storefront whose marker
/// appears (case-insensitively) in the block markup
#[derive(Debug, Clone)]
pub struct VendorMarkerResolver {
    markers: Vec<VendorOrigin>,
}

impl VendorMarkerResolver {
    pub fn new(markers: Vec<VendorOrigin>) -> Self {
        let markers = markers
            .into_iter()
            .map(|m| VendorOrigin {
                marker: m.marker.to_lowercase(),
                origin: m.origin.trim_end_matches('/').to_string(),
            })
            .collect();
        Self { markers }
    }
}

impl OriginResolver for VendorMarkerResolver {
    fn resolve(&self, value: &str, block_html: &str, _page_url: Option<&str>) -> String {
        if !value.starts_with('/') {
            return value.to_string();
        }

        let markup = block_html.to_lowercase();
        match self.markers.iter().find(|m| markup.contains(&m.marker)) {
            Some(vendor) => format!("{}{}", vendor.origin, value),
            None => value.to_string(),
        }
    }
}

/// Build the resolver selected in configuration
pub fn resolver_from_config(config: &OriginConfig) -> Arc<dyn OriginResolver> {
    match config.strategy {
        OriginStrategy::PageUrl => Arc::new(PageUrlResolver),
        OriginStrategy::VendorMarkers => {
            Arc::new(VendorMarkerResolver::new(config.vendor_markers.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_vendor_markers;

    fn vendors() -> VendorMarkerResolver {
        VendorMarkerResolver::new(default_vendor_markers())
    }

    #[test]
    fn test_vendor_marker_resolves_root_relative() {
        let block = r#"<div class="product"><img src="https://web-scraping.dev/assets/1.png"></div>"#;
        assert_eq!(
            vendors().resolve("/widgets/1", block, None),
            "https://www.web-scraping.dev/widgets/1"
        );
    }

    #[test]
    fn test_vendor_marker_is_case_insensitive() {
        let block = r#"<div data-source="FlipKart">Laptop</div>"#;
        assert_eq!(
            vendors().resolve("/p/itm123", block, None),
            "https://www.flipkart.com/p/itm123"
        );
    }

    #[test]
    fn test_vendor_marker_priority_follows_list_order() {
        let block = r#"<div>sold on ebay, listed via walmart</div>"#;
        assert_eq!(
            vendors().resolve("/ip/9", block, None),
            "https://www.walmart.com/ip/9"
        );
    }

    #[test]
    fn test_unknown_vendor_stays_relative() {
        let block = r#"<div class="product"><a href="/widgets/1">Widget</a></div>"#;
        assert_eq!(vendors().resolve("/widgets/1", block, None), "/widgets/1");
    }

    #[test]
    fn test_vendor_marker_ignores_non_root_values() {
        let block = r#"<div>web-scraping.dev</div>"#;
        assert_eq!(
            vendors().resolve("https://cdn.test/a.png", block, None),
            "https://cdn.test/a.png"
        );
        assert_eq!(vendors().resolve("item/4", block, None), "item/4");
    }

    #[test]
    fn test_page_url_join() {
        let resolver = PageUrlResolver;
        let page = Some("https://shop.test/cat/laptops?page=1");

        assert_eq!(
            resolver.resolve("/widgets/1", "", page),
            "https://shop.test/widgets/1"
        );
        assert_eq!(
            resolver.resolve("thinkpad-x1", "", page),
            "https://shop.test/cat/thinkpad-x1"
        );
        assert_eq!(
            resolver.resolve("//cdn.shop.test/x.jpg", "", page),
            "https://cdn.shop.test/x.jpg"
        );
        assert_eq!(
            resolver.resolve("https://other.test/p/2", "", page),
            "https://other.test/p/2"
        );
    }

    #[test]
    fn test_page_url_without_base_leaves_value() {
        let resolver = PageUrlResolver;
        assert_eq!(resolver.resolve("/widgets/1", "", None), "/widgets/1");
        assert_eq!(
            resolver.resolve("/widgets/1", "", Some("not a url")),
            "/widgets/1"
        );
    }
}
