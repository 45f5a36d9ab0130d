//! Order/contract number detection.

use tracing::debug;

use super::patterns::ORDER_NUMBER_PATTERNS;

/// Find the order number, trying the known formats in priority order.
pub fn find_order_number(text: &str) -> Option<String> {
    for pattern in ORDER_NUMBER_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let number = caps[1].to_string();
            debug!(%number, "order number found");
            return Some(number);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_suffixed_format() {
        assert_eq!(
            find_order_number("Commande N° 4500791137/ROTI"),
            Some("4500791137/ROTI".to_string())
        );
    }

    #[test]
    fn test_labelled_formats() {
        assert_eq!(
            find_order_number("N° commande : 4500791137"),
            Some("4500791137".to_string())
        );
        assert_eq!(
            find_order_number("Commande : 4500791137"),
            Some("4500791137".to_string())
        );
    }

    #[test]
    fn test_generic_long_number() {
        assert_eq!(
            find_order_number("Ref N° 45007911"),
            Some("45007911".to_string())
        );
        // Seven digits are not enough for the generic format
        assert_eq!(find_order_number("Ref N° 4500791"), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            find_order_number("COMMANDE N° 123/AB"),
            Some("123/AB".to_string())
        );
    }
}
