use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One output column of a product record.
///
/// Declaration order is column order in every export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Price,
    Availability,
    Url,
    ImageUrl,
    Seller,
    Rating,
    UnitsSold,
    Condition,
    DeliveryCost,
    SellerRating,
    OriginalPrice,
    DiscountPct,
    StockQty,
    Category,
    SellerInfo,
    DeliveryInfo,
    StockStatus,
    Badge,
    Code,
    Specs,
    ScrapedDate,
    ScrapedTime,
}

impl Field {
    pub const COUNT: usize = 23;

    pub const ALL: [Field; Field::COUNT] = [
        Field::Name,
        Field::Price,
        Field::Availability,
        Field::Url,
        Field::ImageUrl,
        Field::Seller,
        Field::Rating,
        Field::UnitsSold,
        Field::Condition,
        Field::DeliveryCost,
        Field::SellerRating,
        Field::OriginalPrice,
        Field::DiscountPct,
        Field::StockQty,
        Field::Category,
        Field::SellerInfo,
        Field::DeliveryInfo,
        Field::StockStatus,
        Field::Badge,
        Field::Code,
        Field::Specs,
        Field::ScrapedDate,
        Field::ScrapedTime,
    ];

    /// Column header used in CSV/XLSX output and JSON keys
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::Availability => "availability",
            Field::Url => "url",
            Field::ImageUrl => "image_url",
            Field::Seller => "seller",
            Field::Rating => "rating",
            Field::UnitsSold => "units_sold",
            Field::Condition => "condition",
            Field::DeliveryCost => "delivery_cost",
            Field::SellerRating => "seller_rating",
            Field::OriginalPrice => "original_price",
            Field::DiscountPct => "discount_pct",
            Field::StockQty => "stock_qty",
            Field::Category => "category",
            Field::SellerInfo => "seller_info",
            Field::DeliveryInfo => "delivery_info",
            Field::StockStatus => "stock_status",
            Field::Badge => "badge",
            Field::Code => "code",
            Field::Specs => "specs",
            Field::ScrapedDate => "scraped_date",
            Field::ScrapedTime => "scraped_time",
        }
    }

    /// Stamp fields are filled from the clock, never from markup.
    pub fn is_stamp(self) -> bool {
        matches!(self, Field::ScrapedDate | Field::ScrapedTime)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single extracted listing.
///
/// Every field is always present; a value that no selector produced is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductRecord {
    values: [Option<String>; Field::COUNT],
}

impl ProductRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    pub fn set(&mut self, field: Field, value: Option<String>) {
        self.values[field.index()] = value;
    }

    /// Builder-style setter, handy when assembling fixtures
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    /// Fields and values in column order
    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<&str>)> + '_ {
        Field::ALL.iter().map(move |&field| (field, self.get(field)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        Field::ALL.iter().map(|field| field.as_str())
    }
}

impl Serialize for ProductRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.as_str(), &value)?;
        }
        map.end()
    }
}
