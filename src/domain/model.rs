use crate::core::selector::SkipReason;
use serde::Serialize;
use std::collections::BTreeMap;

/// Column names of the inventory export that the exporter reads.
pub mod columns {
    pub const SKU: &str = "Custom Label (SKU)";
    pub const LISTED: &str = "Listed";
    pub const TITLE: &str = "Title";
    pub const PRICE: &str = "Price";
    pub const QUANTITY: &str = "Quantity";
    pub const CONDITION_ID: &str = "Condition ID";
    pub const DESCRIPTION: &str = "Description";
}

/// Number of columns in every row of the draft-listing upload file.
pub const COLUMN_COUNT: usize = 11;

pub const ACTION_DRAFT: &str = "Draft";
pub const CATEGORY_ID: &str = "47140";
pub const FORMAT_FIXED_PRICE: &str = "FixedPrice";

/// Fixed rows at the top of the upload template: four `#INFO` lines
/// followed by the column header line.
pub const PREAMBLE: [[&str; COLUMN_COUNT]; 5] = [
    [
        "#INFO",
        "Version=0.0.2",
        "Template= eBay-draft-listings-template_US",
        "", "", "", "", "", "", "", "",
    ],
    [
        "#INFO Action and Category ID are required fields. 1) Set Action to Draft 2) Please find the category ID for your listings here: https://pages.ebay.com/sellerinformation/news/categorychanges.html",
        "", "", "", "", "", "", "", "", "", "",
    ],
    [
        "#INFO After you've successfully uploaded your draft from the Seller Hub Reports tab, complete your drafts to active listings here: https://www.ebay.com/sh/lst/drafts",
        "", "", "", "", "", "", "", "", "", "",
    ],
    ["#INFO", "", "", "", "", "", "", "", "", "", ""],
    [
        "Action(SiteID=US|Country=US|Currency=USD|Version=1193|CC=UTF-8)",
        "Custom label (SKU)",
        "Category ID",
        "Title",
        "UPC",
        "Price",
        "Quantity",
        "Item photo URL",
        "Condition ID",
        "Description",
        "Format",
    ],
];

/// One row of the inventory export, keyed by header name.
///
/// Records are immutable once parsed. Columns missing from the row (or from
/// the header) are simply absent, so every accessor returns an `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InputRecord {
    fields: BTreeMap<String, String>,
}

impl InputRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn sku(&self) -> Option<&str> {
        self.get(columns::SKU)
    }

    pub fn listed(&self) -> Option<&str> {
        self.get(columns::LISTED)
    }

    pub fn title(&self) -> Option<&str> {
        self.get(columns::TITLE)
    }

    pub fn price(&self) -> Option<&str> {
        self.get(columns::PRICE)
    }

    pub fn quantity(&self) -> Option<&str> {
        self.get(columns::QUANTITY)
    }

    pub fn condition_id(&self) -> Option<&str> {
        self.get(columns::CONDITION_ID)
    }

    pub fn description(&self) -> Option<&str> {
        self.get(columns::DESCRIPTION)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InputRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One data row of the upload file, in template column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftListing {
    pub action: &'static str,
    pub sku: String,
    pub category_id: &'static str,
    pub title: String,
    pub upc: &'static str,
    pub price: String,
    pub quantity: String,
    pub photo_url: &'static str,
    pub condition_id: String,
    pub description: String,
    pub format: &'static str,
}

impl DraftListing {
    pub fn to_row(&self) -> [&str; COLUMN_COUNT] {
        [
            self.action,
            &self.sku,
            self.category_id,
            &self.title,
            self.upc,
            &self.price,
            &self.quantity,
            self.photo_url,
            &self.condition_id,
            &self.description,
            self.format,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub rows_read: usize,
    pub selected: Vec<InputRecord>,
    pub skipped: BTreeMap<SkipReason, usize>,
    /// The rendered upload file, preamble included.
    pub document: Vec<u8>,
}
