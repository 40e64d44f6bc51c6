use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ConfigError;
use crate::models::Field;

/// CSS selectors for locating product blocks and their fields.
///
/// Every list is a priority cascade: the first selector that yields a
/// non-empty value wins. Site-specific and generic selectors are mixed in
/// one list, so supporting a new storefront means appending selectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub block_selectors: Vec<String>,
    pub fields: Vec<FieldSelectors>,
}

/// Selectors for one output column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSelectors {
    pub field: Field,
    pub selectors: Vec<String>,
    /// Read this attribute instead of the element text
    #[serde(default)]
    pub attribute: Option<String>,
}

impl FieldSelectors {
    fn text(field: Field, selectors: &[&str]) -> Self {
        Self {
            field,
            selectors: owned(selectors),
            attribute: None,
        }
    }

    fn attr(field: Field, attribute: &str, selectors: &[&str]) -> Self {
        Self {
            field,
            selectors: owned(selectors),
            attribute: Some(attribute.to_string()),
        }
    }
}

fn owned(selectors: &[&str]) -> Vec<String> {
    selectors.iter().map(|s| s.to_string()).collect()
}

impl SelectorConfig {
    /// Reject tables that would break the record schema
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_selectors.is_empty() {
            return Err(ConfigError::Selectors(
                "at least one block selector is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in &self.fields {
            if spec.field.is_stamp() {
                return Err(ConfigError::Selectors(format!(
                    "{} is stamped at extraction time and cannot have selectors",
                    spec.field
                )));
            }
            if !seen.insert(spec.field) {
                return Err(ConfigError::Selectors(format!(
                    "{} is listed more than once",
                    spec.field
                )));
            }
        }
        Ok(())
    }

    pub fn field(&self, field: Field) -> Option<&FieldSelectors> {
        self.fields.iter().find(|spec| spec.field == field)
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            block_selectors: owned(&[
                ".product", // web-scraping.dev
                ".row.product",
                ".product-card",
                ".product-tile",
                ".product-item",
                ".product-listing",
                ".plp-card",
                "div._4ddWXP",                         // Flipkart
                "div[data-automation-id*='product']", // Walmart
                "div.s-item",                          // eBay
            ]),
            fields: vec![
                FieldSelectors::text(
                    Field::Name,
                    &[
                        ".product-name",
                        "h2.product-name",
                        "h3.product-name",
                        "h2.product-title",
                        "h3.product-title",
                        ".product-title",
                        "h2",
                        "h3",
                    ],
                ),
                FieldSelectors::text(
                    Field::Price,
                    &[
                        ".product-price",
                        ".price",
                        "span.price",
                        ".sale-price",
                        "[class*='price']",
                        ".current-price",
                        ".item-price",
                        "div._30jeq3",
                        "span._16Jk6d",
                        "span[data-automation-id*='price']",
                        "span.s-item-price",
                    ],
                ),
                FieldSelectors::text(
                    Field::Availability,
                    &[
                        ".availability",
                        ".stock-status",
                        ".in-stock",
                        ".stock",
                        "[class*='availability']",
                        "[class*='stock']",
                        ".stock-info",
                        "span.SECONDARY_INFO",
                    ],
                ),
                FieldSelectors::attr(
                    Field::Url,
                    "href",
                    &[
                        "a.product-link",
                        "a.product-name",
                        ".product a",
                        "a[href*='product']",
                        "a[href*='item']",
                        "a",
                    ],
                ),
                FieldSelectors::attr(
                    Field::ImageUrl,
                    "src",
                    &[
                        "img.product-image",
                        "img.product-thumbnail",
                        "img.product-thumb",
                        ".product-image img",
                        "img[src*='product']",
                        "img[alt*='product']",
                    ],
                ),
                FieldSelectors::text(
                    Field::Seller,
                    &[
                        ".seller-name",
                        ".vendor-name",
                        ".store-name",
                        "[class*='seller']",
                        "[class*='vendor']",
                        "[class*='store']",
                    ],
                ),
                FieldSelectors::text(
                    Field::Rating,
                    &[
                        ".product-rating",
                        ".rating",
                        ".star-rating",
                        ".review-score",
                        "[class*='rating']",
                        "[class*='stars']",
                    ],
                ),
                FieldSelectors::text(
                    Field::UnitsSold,
                    &[
                        ".sold-count",
                        ".units-sold",
                        "[class*='sold']",
                        "[class*='purchased']",
                        ".popularity",
                        ".buy-count",
                    ],
                ),
                FieldSelectors::text(
                    Field::Condition,
                    &[
                        ".condition",
                        ".product-condition",
                        "[class*='condition']",
                        "[class*='refurbish']",
                    ],
                ),
                // Broad delivery/shipping matches live under delivery_info
                FieldSelectors::text(
                    Field::DeliveryCost,
                    &[".delivery-cost", ".shipping-cost", ".shipping-price"],
                ),
                FieldSelectors::text(
                    Field::SellerRating,
                    &[
                        ".seller-rating",
                        ".seller-score",
                        ".store-rating",
                        "[class*='seller-rating']",
                        "[class*='positive']",
                    ],
                ),
                FieldSelectors::text(
                    Field::OriginalPrice,
                    &[
                        ".original-price",
                        ".old-price",
                        ".rrp",
                        ".mrp-price",
                        "[class*='original-price']",
                        "[class*='mrp']",
                    ],
                ),
                FieldSelectors::text(
                    Field::DiscountPct,
                    &[
                        ".discount-percentage",
                        ".discount-badge",
                        ".percent-off",
                        ".savings",
                        "[class*='discount-percent']",
                        "[class*='off']",
                    ],
                ),
                FieldSelectors::text(
                    Field::StockQty,
                    &[
                        ".stock-count",
                        ".quantity-left",
                        ".inventory-count",
                        ".units-left",
                        "[class*='stock-count']",
                        "[data-stock]",
                    ],
                ),
                FieldSelectors::text(
                    Field::Category,
                    &[
                        ".breadcrumb",
                        ".product-category",
                        ".category-tag",
                        "[class*='category']",
                        "[class*='breadcrumb']",
                    ],
                ),
                FieldSelectors::text(
                    Field::SellerInfo,
                    &[
                        ".seller-info",
                        ".merchant-name",
                        ".store-badge",
                        "[class*='seller-badge']",
                        "[class*='merchant']",
                    ],
                ),
                FieldSelectors::text(
                    Field::DeliveryInfo,
                    &[
                        ".delivery-info",
                        ".shipping-info",
                        ".delivery-date",
                        "[class*='delivery']",
                        "[class*='shipping-date']",
                        "[class*='shipping']",
                    ],
                ),
                FieldSelectors::text(
                    Field::StockStatus,
                    &[
                        ".out-of-stock",
                        ".stock-status",
                        "[data-availability]",
                        "[class*='low-stock']",
                        "[class*='stock-status']",
                    ],
                ),
                FieldSelectors::text(
                    Field::Badge,
                    &[
                        ".badge",
                        ".product-badge",
                        ".hot-deal",
                        ".sale-badge",
                        ".new-product",
                        ".best-seller",
                        "[class*='badge']",
                        "[class*='label']",
                    ],
                ),
                FieldSelectors::text(
                    Field::Code,
                    &[
                        ".product-sku",
                        ".sku",
                        "[data-product-id]",
                        "[data-sku]",
                        "[class*='sku']",
                    ],
                ),
                FieldSelectors::text(
                    Field::Specs,
                    &[
                        ".specs",
                        ".highlights",
                        ".product-specs",
                        ".feature-list",
                        "[class*='spec']",
                    ],
                ),
            ],
        }
    }
}
