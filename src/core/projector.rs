use crate::domain::model::{
    DraftListing, InputRecord, ACTION_DRAFT, CATEGORY_ID, FORMAT_FIXED_PRICE, PREAMBLE,
};
use crate::utils::error::Result;
use std::io;

pub const DEFAULT_TITLE: &str = "Default Title";
pub const DEFAULT_PRICE: &str = "0";
pub const DEFAULT_QUANTITY: &str = "1";
pub const DEFAULT_CONDITION_ID: &str = "NEW";
pub const DEFAULT_DESCRIPTION: &str = "<p><CENTER><H4>This is a Test Auction...Please Do Not Bid</H4></CENTER><P>This is one of those test auctions. Please do not bid as there is no merchandise being auctioned.</P>";

const CURRENCY_SYMBOLS: &[char] = &['$', '£', '€', '¥'];

/// Values used when an input column is missing.
///
/// Title, quantity, condition and description fall back only when the column
/// is absent; an empty cell is passed through. Price also falls back when the
/// cell is empty once currency symbols are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefaults {
    pub title: String,
    pub price: String,
    pub quantity: String,
    pub condition_id: String,
    pub description: String,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            price: DEFAULT_PRICE.to_string(),
            quantity: DEFAULT_QUANTITY.to_string(),
            condition_id: DEFAULT_CONDITION_ID.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Projector {
    defaults: FieldDefaults,
}

impl Projector {
    pub fn new(defaults: FieldDefaults) -> Self {
        Self { defaults }
    }

    pub fn project(&self, record: &InputRecord) -> DraftListing {
        let defaults = &self.defaults;

        let price = record
            .price()
            .map(strip_currency)
            .filter(|p| !p.is_empty())
            .unwrap_or(defaults.price.as_str())
            .to_string();

        DraftListing {
            action: ACTION_DRAFT,
            sku: record.sku().unwrap_or_default().to_string(),
            category_id: CATEGORY_ID,
            title: or_default(record.title(), &defaults.title),
            upc: "",
            price,
            quantity: or_default(record.quantity(), &defaults.quantity),
            photo_url: "",
            condition_id: or_default(record.condition_id(), &defaults.condition_id),
            description: or_default(record.description(), &defaults.description),
            format: FORMAT_FIXED_PRICE,
        }
    }

    /// Writes the preamble and one row per record, CRLF-terminated.
    pub fn write_to<W: io::Write>(&self, records: &[InputRecord], writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(writer);

        for row in PREAMBLE.iter() {
            csv_writer.write_record(row)?;
        }

        for record in records {
            csv_writer.write_record(self.project(record).to_row())?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn render(&self, records: &[InputRecord]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(records, &mut buffer)?;
        Ok(buffer)
    }
}

fn or_default(value: Option<&str>, default: &str) -> String {
    value.unwrap_or(default).to_string()
}

fn strip_currency(price: &str) -> &str {
    price.trim().trim_start_matches(CURRENCY_SYMBOLS).trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::columns;

    fn record(pairs: &[(&str, &str)]) -> InputRecord {
        pairs.iter().copied().collect()
    }

    fn lines(document: &[u8]) -> Vec<String> {
        String::from_utf8(document.to_vec())
            .unwrap()
            .split_terminator("\r\n")
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_project_full_record() {
        let input = record(&[
            (columns::SKU, "101"),
            (columns::TITLE, "Brass lamp"),
            (columns::PRICE, "$12.50"),
            (columns::QUANTITY, "3"),
            (columns::CONDITION_ID, "3000"),
            (columns::DESCRIPTION, "Works"),
        ]);

        let listing = Projector::default().project(&input);

        assert_eq!(
            listing.to_row(),
            ["Draft", "101", "47140", "Brass lamp", "", "12.50", "3", "", "3000", "Works", "FixedPrice"]
        );
    }

    #[test]
    fn test_project_defaults_for_absent_fields() {
        let listing = Projector::default().project(&record(&[(columns::SKU, "71")]));

        assert_eq!(listing.sku, "71");
        assert_eq!(listing.title, DEFAULT_TITLE);
        assert_eq!(listing.price, "0");
        assert_eq!(listing.quantity, "1");
        assert_eq!(listing.condition_id, "NEW");
        assert_eq!(listing.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_price_stripping() {
        let projector = Projector::default();
        let price_of = |raw: &str| {
            projector
                .project(&record(&[(columns::SKU, "80"), (columns::PRICE, raw)]))
                .price
        };

        assert_eq!(price_of("$12.50"), "12.50");
        assert_eq!(price_of(" $ 7 "), "7");
        assert_eq!(price_of("€3.10"), "3.10");
        assert_eq!(price_of("4.00"), "4.00");
        assert_eq!(price_of(""), "0");
        assert_eq!(price_of("$"), "0");
    }

    #[test]
    fn test_empty_cells_pass_through() {
        let listing = Projector::default().project(&record(&[
            (columns::SKU, "90"),
            (columns::TITLE, ""),
            (columns::QUANTITY, ""),
        ]));

        assert_eq!(listing.title, "");
        assert_eq!(listing.quantity, "");
    }

    #[test]
    fn test_configured_description_default() {
        let projector = Projector::new(FieldDefaults {
            description: "See photos".to_string(),
            ..FieldDefaults::default()
        });

        let listing = projector.project(&record(&[(columns::SKU, "90")]));

        assert_eq!(listing.description, "See photos");
        assert_eq!(listing.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_render_without_records_is_preamble_only() {
        let document = Projector::default().render(&[]).unwrap();
        let lines = lines(&document);

        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "#INFO,Version=0.0.2,Template= eBay-draft-listings-template_US,,,,,,,,"
        );
        assert_eq!(lines[3], "#INFO,,,,,,,,,,");
        assert_eq!(
            lines[4],
            "Action(SiteID=US|Country=US|Currency=USD|Version=1193|CC=UTF-8),Custom label (SKU),Category ID,Title,UPC,Price,Quantity,Item photo URL,Condition ID,Description,Format"
        );
    }

    #[test]
    fn test_render_appends_rows_in_order() {
        let records = vec![
            record(&[(columns::SKU, "100"), (columns::TITLE, "B"), (columns::DESCRIPTION, "d")]),
            record(&[(columns::SKU, "71"), (columns::TITLE, "A"), (columns::DESCRIPTION, "d")]),
        ];

        let document = Projector::default().render(&records).unwrap();
        let lines = lines(&document);

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[5], "Draft,100,47140,B,,0,1,,NEW,d,FixedPrice");
        assert_eq!(lines[6], "Draft,71,47140,A,,0,1,,NEW,d,FixedPrice");
    }

    #[test]
    fn test_render_quotes_embedded_commas() {
        let records = vec![record(&[
            (columns::SKU, "72"),
            (columns::TITLE, "Lamp, brass"),
            (columns::DESCRIPTION, "d"),
        ])];

        let document = Projector::default().render(&records).unwrap();

        assert_eq!(
            lines(&document)[5],
            "Draft,72,47140,\"Lamp, brass\",,0,1,,NEW,d,FixedPrice"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let records = vec![record(&[(columns::SKU, "150"), (columns::PRICE, "$1")])];
        let projector = Projector::default();

        assert_eq!(
            projector.render(&records).unwrap(),
            projector.render(&records).unwrap()
        );
    }
}
