//! Position-keyed reconciliation of two item lists.

use std::collections::BTreeMap;

use crate::error::ExtractionError;
use crate::models::order::LineItem;

/// Merge two item lists keyed by position.
///
/// `secondary` seeds the result; `primary` fills any field that is empty in
/// the seeded entry and contributes whole items for positions `secondary`
/// does not have. The result is sorted by position interpreted as an
/// integer; a non-integer position is an error.
pub fn merge_items(
    primary: &[LineItem],
    secondary: &[LineItem],
) -> Result<Vec<LineItem>, ExtractionError> {
    let mut merged: BTreeMap<i64, LineItem> = BTreeMap::new();

    for item in secondary {
        merged.insert(parse_position(&item.position)?, item.clone());
    }
    for item in primary {
        let key = parse_position(&item.position)?;
        match merged.get_mut(&key) {
            Some(existing) => fill_missing(existing, item),
            None => {
                merged.insert(key, item.clone());
            }
        }
    }

    Ok(merged.into_values().collect())
}

fn parse_position(position: &str) -> Result<i64, ExtractionError> {
    position
        .trim()
        .parse()
        .map_err(|_| ExtractionError::InvalidPosition(position.to_string()))
}

fn fill_missing(target: &mut LineItem, source: &LineItem) {
    fn fill(dst: &mut Option<String>, src: &Option<String>) {
        let dst_empty = dst.as_deref().map_or(true, str::is_empty);
        if dst_empty {
            if let Some(value) = src {
                if !value.is_empty() {
                    *dst = Some(value.clone());
                }
            }
        }
    }

    fill(&mut target.product_name, &source.product_name);
    fill(&mut target.quantity, &source.quantity);
    fill(&mut target.unit, &source.unit);
    fill(&mut target.unit_price, &source.unit_price);
    fill(&mut target.delivery_date, &source.delivery_date);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(position: &str, name: Option<&str>, quantity: Option<&str>) -> LineItem {
        LineItem {
            product_name: name.map(String::from),
            quantity: quantity.map(String::from),
            ..LineItem::new(position, "1001")
        }
    }

    #[test]
    fn test_non_empty_fields_win() {
        let primary = vec![item("1", Some("Widget"), None)];
        let secondary = vec![item("1", None, Some("5"))];

        let merged = merge_items(&primary, &secondary).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].product_name, Some("Widget".to_string()));
        assert_eq!(merged[0].quantity, Some("5".to_string()));
    }

    #[test]
    fn test_secondary_values_are_not_overwritten() {
        let primary = vec![item("1", Some("Autre"), None)];
        let secondary = vec![item("1", Some("Widget"), None)];

        let merged = merge_items(&primary, &secondary).unwrap();
        assert_eq!(merged[0].product_name, Some("Widget".to_string()));
    }

    #[test]
    fn test_primary_only_items_are_inserted() {
        let primary = vec![item("3", Some("Widget"), None)];
        let secondary = vec![item("1", None, None)];

        let merged = merge_items(&primary, &secondary).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].position, "1");
        assert_eq!(merged[1].position, "3");
    }

    #[test]
    fn test_sorted_by_integer_position() {
        let primary = vec![item("10", None, None), item("2", None, None)];
        let secondary = vec![item("1", None, None)];

        let merged = merge_items(&primary, &secondary).unwrap();
        let positions: Vec<&str> = merged.iter().map(|i| i.position.as_str()).collect();
        // "10" sorts after "2" numerically, not lexically
        assert_eq!(positions, vec!["1", "2", "10"]);
    }

    #[test]
    fn test_non_integer_position_is_an_error() {
        let bad = vec![item("1a", None, None)];
        let err = merge_items(&bad, &[]).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidPosition(p) if p == "1a"));
    }
}
