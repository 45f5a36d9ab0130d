//! Line-item segmentation.
//!
//! A line whose first two whitespace tokens are both purely numeric opens a
//! new item (position + designation). The remaining fields are filled from
//! the trigger line's trailing tokens and from nearby lines; a product name
//! pushed onto the following page by a footer or a total line is recovered
//! from that page's text.

use tracing::debug;

use super::dates::{self, DATE_WINDOW};
use super::patterns::{HAS_DIGIT, LIVRAISON, MONTANT_TOTAL_HT, PAGE_FOOTER, QUANTITY_TOKEN, UNIT_PRICE_TOKEN};
use crate::models::order::LineItem;

/// Lines of context, starting at the trigger line, searched for a
/// "livraison" keyword when the trigger line itself has no date.
const CONTEXT_LINES: usize = 5;

/// Split one page's text into line items.
///
/// `next_page_text` is the following page's text when there is one; it is
/// only consulted for the deferred product-name case.
pub fn segment_page(text: &str, next_page_text: Option<&str>) -> Vec<LineItem> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut items = Vec::new();
    let mut current: Option<LineItem> = None;

    for (index, line) in lines.iter().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 || !is_numeric(parts[0]) || !is_numeric(parts[1]) {
            continue;
        }

        if let Some(done) = current.take() {
            items.push(done);
        }
        let mut item = LineItem::new(parts[0], parts[1]);

        // date on the trigger line itself, then near a "livraison" keyword
        // in the following lines
        item.delivery_date = dates::find_date(line, None);
        if item.delivery_date.is_none() {
            let context = lines[index..(index + CONTEXT_LINES).min(lines.len())].join("\n");
            if let Some(anchor) = LIVRAISON.find(&context) {
                item.delivery_date = dates::find_date_in_window(&context, anchor.start(), DATE_WINDOW);
            }
        }

        // first numeric token followed by a digit-free unit token; a
        // strictly-shaped amount right after the unit is the unit price
        for j in 2..parts.len() {
            if QUANTITY_TOKEN.is_match(parts[j])
                && j + 1 < parts.len()
                && !HAS_DIGIT.is_match(parts[j + 1])
            {
                item.quantity = Some(parts[j].to_string());
                item.unit = Some(parts[j + 1].to_string());
                if j + 2 < parts.len() && UNIT_PRICE_TOKEN.is_match(parts[j + 2]) {
                    item.unit_price = Some(parts[j + 2].to_string());
                }
                break;
            }
        }

        // product name: the next line, unless a footer or the total line
        // pushed it onto the following page
        if index + 1 < lines.len() {
            let next_line = lines[index + 1];
            if PAGE_FOOTER.is_match(next_line) || MONTANT_TOTAL_HT.is_match(next_line) {
                if let Some(next_text) = next_page_text {
                    item.product_name = product_name_after_montant_ht(next_text);
                }
            } else if !first_token_is_numeric(next_line) {
                item.product_name = Some(next_line.to_string());
            }
        }

        current = Some(item);
    }

    if let Some(done) = current.take() {
        items.push(done);
    }
    debug!(count = items.len(), "page segmented into items");
    items
}

/// On a continuation page, the product name is the first non-empty line
/// after a "Montant HT" marker whose leading token is not numeric.
fn product_name_after_montant_ht(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    for (index, line) in lines.iter().enumerate() {
        if !line.contains("Montant HT") {
            continue;
        }
        if let Some(name) = lines[index + 1..]
            .iter()
            .map(|line| line.trim())
            .find(|line| !line.is_empty() && !first_token_is_numeric(line))
        {
            return Some(name.to_string());
        }
    }
    None
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn first_token_is_numeric(line: &str) -> bool {
    line.split_whitespace().next().is_some_and(is_numeric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_item_with_name_on_next_line() {
        let items = segment_page("1 1001 5 U 1.200,00\nWidget A", None);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].position, "1");
        assert_eq!(items[0].designation, "1001");
        assert_eq!(items[0].product_name, Some("Widget A".to_string()));
        assert_eq!(items[0].quantity, Some("5".to_string()));
        assert_eq!(items[0].unit, Some("U".to_string()));
        assert_eq!(items[0].unit_price, Some("1.200,00".to_string()));
    }

    #[test]
    fn test_no_trigger_lines_yields_nothing() {
        assert!(segment_page("Conditions de paiement\nTexte libre", None).is_empty());
    }

    #[test]
    fn test_item_start_closes_previous_item() {
        let text = "1 1001 2 U 10,00\nPremier produit\n2 1002 3 PC 20,00\nSecond produit";
        let items = segment_page(text, None);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_name, Some("Premier produit".to_string()));
        assert_eq!(items[1].position, "2");
        assert_eq!(items[1].product_name, Some("Second produit".to_string()));
    }

    #[test]
    fn test_numeric_next_line_is_not_a_name() {
        let items = segment_page("1 1001 2 U 10,00\n42 pieces detachees", None);
        assert_eq!(items[0].product_name, None);
    }

    #[test]
    fn test_date_on_trigger_line() {
        let items = segment_page("1 1001 15.07.2024 2 U 10,00\nProduit", None);
        assert_eq!(items[0].delivery_date, Some("15.07.2024".to_string()));
    }

    #[test]
    fn test_date_from_livraison_context() {
        let text = "1 1001 2 U 10,00\nProduit\nDate de livraison : 5-7-24";
        let items = segment_page(text, None);
        assert_eq!(items[0].delivery_date, Some("5-7-24".to_string()));
    }

    #[test]
    fn test_quantity_requires_digit_free_unit() {
        // "200" is followed by another numeric token, so the scan moves on
        let items = segment_page("1 1001 200 300 4 U 10,00\nProduit", None);
        assert_eq!(items[0].quantity, Some("4".to_string()));
        assert_eq!(items[0].unit, Some("U".to_string()));
    }

    #[test]
    fn test_unit_price_must_follow_unit() {
        let items = segment_page("1 1001 2 U suite 1.200,00\nProduit", None);
        assert_eq!(items[0].quantity, Some("2".to_string()));
        assert_eq!(items[0].unit_price, None);
    }

    #[test]
    fn test_first_quantity_match_is_kept() {
        let items = segment_page("1 1001 2 U 10,00 7 PC 20,00\nProduit", None);
        assert_eq!(items[0].quantity, Some("2".to_string()));
        assert_eq!(items[0].unit, Some("U".to_string()));
        assert_eq!(items[0].unit_price, Some("10,00".to_string()));
    }

    #[test]
    fn test_page_footer_defers_name_to_next_page() {
        let page = "1 1001 2 U 10,00\nPage 1 / 2";
        let next = "Montant HT\n120\nDisjoncteur haute tension\nTotal";
        let items = segment_page(page, Some(next));
        assert_eq!(
            items[0].product_name,
            Some("Disjoncteur haute tension".to_string())
        );
    }

    #[test]
    fn test_montant_total_line_defers_name_to_next_page() {
        let page = "1 1001 2 U 10,00\nMontant total HT 120,00";
        let next = "Suite de commande\nMontant HT\nSectionneur 24kV";
        let items = segment_page(page, Some(next));
        assert_eq!(items[0].product_name, Some("Sectionneur 24kV".to_string()));
    }

    #[test]
    fn test_deferred_name_without_next_page_stays_unresolved() {
        let items = segment_page("1 1001 2 U 10,00\nPage 1 / 2", None);
        assert_eq!(items[0].product_name, None);
    }

    #[test]
    fn test_last_item_finalized_at_page_end() {
        let items = segment_page("1 1001 2 U 10,00", None);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_name, None);
    }
}
