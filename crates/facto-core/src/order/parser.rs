//! The orchestrating parser: one document in, one [`OrderData`] out.

use tracing::{debug, info, warn};

use super::place::{left_column_lines, PlaceResolver};
use super::rules::{amounts, dates, items, order_number};
use super::zone;
use crate::error::Result;
use crate::geo::GeocodeLookup;
use crate::models::config::{FactoConfig, HeaderStrategy};
use crate::models::order::{HeaderFields, OrderData};
use crate::pdf::DocumentSource;

/// Drives per-page extraction and aggregates one result per document.
///
/// `parse` returns the result directly; callers hand it to the export or
/// response layer themselves. One parser instance can be reused across
/// documents but holds no per-document state.
pub struct OrderParser<'a> {
    config: &'a FactoConfig,
    geocoder: &'a dyn GeocodeLookup,
}

impl<'a> OrderParser<'a> {
    pub fn new(config: &'a FactoConfig, geocoder: &'a dyn GeocodeLookup) -> Self {
        Self { config, geocoder }
    }

    /// Parse one document.
    ///
    /// A page whose text cannot be extracted contributes zero items and the
    /// run continues; partial results are fine.
    pub fn parse(&self, doc: &dyn DocumentSource) -> Result<OrderData> {
        let page_count = doc.page_count();
        if page_count == 0 {
            return Err(crate::error::PdfError::NoPages.into());
        }

        let mut page_texts = Vec::with_capacity(page_count);
        for page in 0..page_count {
            match doc.page_text(page) {
                Ok(text) => page_texts.push(text),
                Err(err) => {
                    warn!(page = page + 1, error = %err, "page skipped");
                    page_texts.push(String::new());
                }
            }
        }
        let full_text = page_texts.join("\n");

        // page 1 carries the document-wide fields
        let first_page_text = page_texts[0].as_str();
        let global_date = dates::find_global_delivery_date(first_page_text);
        let order_number = order_number::find_order_number(first_page_text);

        let header = self.resolve_header(doc, &full_text);

        let mut all_items = Vec::new();
        for page in 0..page_count {
            let text = page_texts[page].as_str();
            if text.is_empty() {
                continue;
            }
            let next_page_text = page_texts
                .get(page + 1)
                .map(String::as_str)
                .filter(|text| !text.is_empty());

            let mut page_items = items::segment_page(text, next_page_text);
            debug!(
                page = page + 1,
                count = page_items.len(),
                "items found on page"
            );
            for item in &mut page_items {
                if item.delivery_date.is_none() {
                    item.delivery_date = global_date.clone();
                }
            }
            all_items.extend(page_items);
        }

        let total_ht = amounts::find_total(&full_text);

        info!(
            items = all_items.len(),
            total = total_ht.as_deref().unwrap_or("-"),
            order = order_number.as_deref().unwrap_or("-"),
            "document parsed"
        );

        Ok(OrderData {
            items: all_items,
            total_ht,
            order_number,
            header,
        })
    }

    fn resolve_header(&self, doc: &dyn DocumentSource, full_text: &str) -> HeaderFields {
        match self.config.extraction.header_strategy {
            HeaderStrategy::CityLookup => {
                let resolver =
                    PlaceResolver::new(self.geocoder, &self.config.geocoding, &self.config.zones);
                HeaderFields::City {
                    city: resolver.find_city(doc, full_text),
                }
            }
            HeaderStrategy::ObjectAndZone => {
                let object_lines = left_column_lines(
                    doc,
                    0,
                    self.config.zones.left_column_ratio,
                    self.config.extraction.objet_line_count,
                );
                let delivery_text = zone::delivery_zone_text(
                    doc,
                    0,
                    &self.config.zones.delivery_address,
                    &self.config.zones.delivery_boilerplate,
                )
                .unwrap_or_else(|err| {
                    warn!(error = %err, "delivery zone extraction failed");
                    String::new()
                });
                let delivery_place_lines = delivery_text
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect();
                HeaderFields::ObjectAndZone {
                    object_lines,
                    delivery_place_lines,
                }
            }
        }
    }
}
