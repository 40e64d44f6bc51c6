use scraper::{ElementRef, Html};
use std::sync::Arc;
use tracing::{debug, info};

use super::cascade::{Locator, first_match};
use super::origin::{OriginResolver, PageUrlResolver};
use crate::clock::{Clock, SystemClock};
use crate::config::SelectorConfig;
use crate::models::{Field, ProductRecord};

/// Compiled cascade for one output column
#[derive(Debug, Clone)]
struct FieldCascade {
    field: Field,
    locator: Locator,
    attribute: Option<String>,
}

/// Rule-based product extraction over a whole listing page.
///
/// Pure with respect to I/O: the only inputs are the HTML string, the
/// selector table, the origin resolver and the clock used for stamping.
pub struct ProductExtractor {
    blocks: Locator,
    fields: Vec<FieldCascade>,
    resolver: Arc<dyn OriginResolver>,
    clock: Arc<dyn Clock>,
}

impl ProductExtractor {
    pub fn new(
        selectors: &SelectorConfig,
        resolver: Arc<dyn OriginResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let fields = selectors
            .fields
            .iter()
            .filter(|spec| !spec.field.is_stamp())
            .map(|spec| FieldCascade {
                field: spec.field,
                locator: Locator::new(&spec.selectors),
                attribute: spec.attribute.clone(),
            })
            .collect();

        ProductExtractor {
            blocks: Locator::new(&selectors.block_selectors),
            fields,
            resolver,
            clock,
        }
    }

    /// Default selector table, page-URL resolution, wall clock
    pub fn with_defaults() -> Self {
        Self::new(
            &SelectorConfig::default(),
            Arc::new(PageUrlResolver),
            Arc::new(SystemClock),
        )
    }

    /// Extract products from a page whose URL is unknown
    pub fn extract(&self, html: &str) -> Vec<ProductRecord> {
        self.extract_page(html, None)
    }

    /// Extract products, resolving relative links against `page_url`
    pub fn extract_page(&self, html: &str, page_url: Option<&str>) -> Vec<ProductRecord> {
        let document = Html::parse_document(html);

        let Some((pattern, blocks)) = self.find_blocks(&document) else {
            info!("🔍 No product blocks matched any of {} block selectors", self.blocks.len());
            return Vec::new();
        };
        info!("🔍 Using block selector '{}' found {} products", pattern, blocks.len());

        let now = self.clock.now();
        let scraped_date = now.format("%Y-%m-%d").to_string();
        let scraped_time = now.format("%H:%M:%S").to_string();

        blocks
            .into_iter()
            .map(|block| {
                let mut record = self.extract_block(block, page_url);
                record.set(Field::ScrapedDate, Some(scraped_date.clone()));
                record.set(Field::ScrapedTime, Some(scraped_time.clone()));
                record
            })
            .collect()
    }

    /// The first block selector with any hits defines the blocks for the whole page
    fn find_blocks<'a>(&self, document: &'a Html) -> Option<(&str, Vec<ElementRef<'a>>)> {
        self.blocks.selectors().find_map(|(pattern, selector)| {
            let found: Vec<ElementRef<'a>> = document.select(selector).collect();
            if found.is_empty() {
                None
            } else {
                Some((pattern, found))
            }
        })
    }

    fn extract_block(&self, block: ElementRef<'_>, page_url: Option<&str>) -> ProductRecord {
        let mut record = ProductRecord::new();
        let mut block_html: Option<String> = None;

        for cascade in &self.fields {
            let mut value = first_match(block, &cascade.locator, cascade.attribute.as_deref());

            if matches!(cascade.field, Field::Url | Field::ImageUrl) {
                if let Some(raw) = value.take() {
                    let markup = block_html.get_or_insert_with(|| block.html());
                    value = Some(self.resolver.resolve(&raw, markup, page_url));
                }
            }

            if value.is_none() {
                debug!("No value for {} in block", cascade.field);
            }
            record.set(cascade.field, value);
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldSelectors, default_vendor_markers};
    use crate::processor::origin::VendorMarkerResolver;
    use chrono::{NaiveDate, NaiveDateTime};

    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn fixed_clock() -> Arc<dyn Clock> {
        let at = NaiveDate::from_ymd_opt(2025, 12, 25)
            .unwrap()
            .and_hms_opt(9, 41, 7)
            .unwrap();
        Arc::new(FixedClock(at))
    }

    fn vendor_extractor() -> ProductExtractor {
        ProductExtractor::new(
            &SelectorConfig::default(),
            Arc::new(VendorMarkerResolver::new(default_vendor_markers())),
            fixed_clock(),
        )
    }

    fn page_extractor() -> ProductExtractor {
        ProductExtractor::new(&SelectorConfig::default(), Arc::new(PageUrlResolver), fixed_clock())
    }

    const THREE_PRODUCTS: &str = r#"
        <html><body>
          <div class="products">
            <div class="product">
              <h3 class="product-name">Box of Chocolate Candy</h3>
              <div class="product-price">24.99</div>
              <a href="https://web-scraping.dev/product/1">details</a>
            </div>
            <div class="product">
              <h3 class="product-name">Dark Red Energy Potion</h3>
              <div class="product-price">4.99</div>
              <a href="/product/2">details</a>
              <img src="/assets/products/potion.webp" alt="web-scraping.dev potion">
            </div>
            <div class="product">
              <h3 class="product-name">Teal Energy Potion</h3>
              <div class="product-price">4.49</div>
              <a href="/product/3">details</a>
            </div>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_three_blocks_in_document_order() {
        let records = vendor_extractor().extract(THREE_PRODUCTS);

        assert_eq!(records.len(), 3);
        let names: Vec<_> = records.iter().map(|r| r.get(Field::Name)).collect();
        assert_eq!(
            names,
            vec![
                Some("Box of Chocolate Candy"),
                Some("Dark Red Energy Potion"),
                Some("Teal Energy Potion")
            ]
        );
        let prices: Vec<_> = records.iter().map(|r| r.get(Field::Price)).collect();
        assert_eq!(prices, vec![Some("24.99"), Some("4.99"), Some("4.49")]);

        // absolute stays absolute, marker resolves, no marker stays relative
        assert_eq!(records[0].get(Field::Url), Some("https://web-scraping.dev/product/1"));
        assert_eq!(
            records[1].get(Field::Url),
            Some("https://www.web-scraping.dev/product/2")
        );
        assert_eq!(
            records[1].get(Field::ImageUrl),
            Some("https://www.web-scraping.dev/assets/products/potion.webp")
        );
        assert_eq!(records[2].get(Field::Url), Some("/product/3"));
    }

    #[test]
    fn test_page_url_strategy_resolves_every_block() {
        let records = page_extractor().extract_page(THREE_PRODUCTS, Some("https://web-scraping.dev/products"));

        assert_eq!(records[1].get(Field::Url), Some("https://web-scraping.dev/product/2"));
        assert_eq!(records[2].get(Field::Url), Some("https://web-scraping.dev/product/3"));
    }

    #[test]
    fn test_no_blocks_gives_empty() {
        let extractor = vendor_extractor();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("<html><body><p>Page not found</p></body></html>").is_empty());
        assert!(extractor.extract("<<<not really html").is_empty());
    }

    #[test]
    fn test_every_record_has_full_schema() {
        let html = r#"<div class="product-card"><span>nothing recognizable</span></div>"#;
        let records = vendor_extractor().extract(html);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.keys().count(), Field::COUNT);
        assert_eq!(record.get(Field::Name), None);
        assert_eq!(record.get(Field::Price), None);
        assert_eq!(record.get(Field::ScrapedDate), Some("2025-12-25"));
        assert_eq!(record.get(Field::ScrapedTime), Some("09:41:07"));
    }

    #[test]
    fn test_vendor_specific_price_beats_generic() {
        let html = r#"
            <div class="product">
              <span class="product-price">$10.00</span>
              <span class="item-price">$99.00</span>
            </div>"#;
        let records = vendor_extractor().extract(html);
        assert_eq!(records[0].get(Field::Price), Some("$10.00"));
    }

    #[test]
    fn test_first_block_selector_is_global_choice() {
        // .product wins for the whole page, the .product-card block is ignored
        let html = r#"
            <div class="product"><h2>Alpha</h2></div>
            <div class="product-card"><h2>Beta</h2></div>
            <div class="product"><h2>Gamma</h2></div>"#;
        let records = vendor_extractor().extract(html);

        let names: Vec<_> = records.iter().filter_map(|r| r.get(Field::Name)).collect();
        assert_eq!(names, vec!["Alpha", "Gamma"]);
    }

    #[test]
    fn test_falls_back_to_later_block_selector() {
        let html = r#"
            <div class="s-item">
              <h3>Refurbished ThinkPad</h3>
              <span class="s-item-price">$199.00</span>
              <span class="condition">Refurbished</span>
              <span class="SECONDARY_INFO">Pre-owned</span>
              <a href="/itm/12345">view</a>
              <span class="seller-info">top-rated ebay seller</span>
            </div>"#;
        let records = vendor_extractor().extract(html);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.get(Field::Name), Some("Refurbished ThinkPad"));
        assert_eq!(record.get(Field::Price), Some("$199.00"));
        assert_eq!(record.get(Field::Condition), Some("Refurbished"));
        assert_eq!(record.get(Field::Availability), Some("Pre-owned"));
        assert_eq!(record.get(Field::Url), Some("https://www.ebay.com/itm/12345"));
    }

    #[test]
    fn test_rich_block_populates_many_fields() {
        let html = r#"
            <div class="product" data-product-id="sku-42">
              <h2 class="product-title">Cat-Ear Beanie</h2>
              <span class="price">$14.99</span>
              <span class="original-price">$19.99</span>
              <span class="discount-percentage">25% off</span>
              <span class="rating">4.5</span>
              <span class="sold-count">1.2k sold</span>
              <span class="seller-name">Knit Co</span>
              <span class="stock-count">7 left</span>
              <span class="badge">Best seller</span>
              <span class="product-sku">BEANIE-42</span>
              <ul class="specs"><li>Wool</li><li>One size</li></ul>
              <span class="delivery-cost">Free</span>
              <span class="delivery-info">Arrives Friday</span>
              <span class="breadcrumb">Apparel</span>
            </div>"#;
        let records = vendor_extractor().extract(html);
        let record = &records[0];

        assert_eq!(record.get(Field::Name), Some("Cat-Ear Beanie"));
        assert_eq!(record.get(Field::Price), Some("$14.99"));
        assert_eq!(record.get(Field::OriginalPrice), Some("$19.99"));
        assert_eq!(record.get(Field::DiscountPct), Some("25% off"));
        assert_eq!(record.get(Field::Rating), Some("4.5"));
        assert_eq!(record.get(Field::UnitsSold), Some("1.2k sold"));
        assert_eq!(record.get(Field::Seller), Some("Knit Co"));
        assert_eq!(record.get(Field::StockQty), Some("7 left"));
        assert_eq!(record.get(Field::Badge), Some("Best seller"));
        assert_eq!(record.get(Field::Code), Some("BEANIE-42"));
        assert_eq!(record.get(Field::Specs), Some("WoolOne size"));
        assert_eq!(record.get(Field::DeliveryCost), Some("Free"));
        assert_eq!(record.get(Field::DeliveryInfo), Some("Arrives Friday"));
        assert_eq!(record.get(Field::Category), Some("Apparel"));
    }

    #[test]
    fn test_custom_table_injection() {
        let selectors = SelectorConfig {
            block_selectors: vec!["li.tile".to_string()],
            fields: vec![FieldSelectors {
                field: Field::Name,
                selectors: vec![".tile-title".to_string()],
                attribute: None,
            }],
        };
        let extractor = ProductExtractor::new(&selectors, Arc::new(PageUrlResolver), fixed_clock());
        let records = extractor.extract(
            r#"<ul><li class="tile"><b class="tile-title">Kettle</b><span class="price">$5</span></li></ul>"#,
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get(Field::Name), Some("Kettle"));
        // price has no cascade in this table
        assert_eq!(records[0].get(Field::Price), None);
    }
}
