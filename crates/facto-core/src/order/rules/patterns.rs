//! Common regex patterns for purchase-order extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date patterns: strict dd.mm.yyyy / dd/mm/yyyy, calendar-validated by
    // the caller
    pub static ref DATE_DOTTED: Regex = Regex::new(
        r"(\d{2})\.(\d{2})\.(\d{4})"
    ).unwrap();

    pub static ref DATE_SLASHED: Regex = Regex::new(
        r"(\d{2})/(\d{2})/(\d{4})"
    ).unwrap();

    // Loose date shape used for windowed searches around a keyword
    pub static ref DATE_LOOSE: Regex = Regex::new(
        r"\d{1,2}[.\-/]\d{1,2}[.\-/]\d{2,4}"
    ).unwrap();

    // Keyword anchoring delivery dates and delivery-place zones
    pub static ref LIVRAISON: Regex = Regex::new(
        r"(?i)livraison"
    ).unwrap();

    pub static ref TOTAL_KEYWORD: Regex = Regex::new(
        r"(?i)total"
    ).unwrap();

    // French amount shapes, most specific first: two-plus dotted thousands
    // groups, long undotted integers, general dotted form, short form
    pub static ref TOTAL_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(\d{1,3}(?:\.\d{3}){2,},\d{2})").unwrap(),
        Regex::new(r"(\d{7,},\d{2})").unwrap(),
        Regex::new(r"(\d{1,3}(?:\.\d{3})*,\d{2})").unwrap(),
        Regex::new(r"(\d{1,6},\d{1,2})").unwrap(),
    ];

    // Order-number formats in priority order:
    // "Commande N° 4500791137/ROTI", "N° commande : 4500791137",
    // "Commande : 4500791137", then any "N°" with 8+ digits
    pub static ref ORDER_NUMBER_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)Commande\s*N°\s*(\d+/[A-Z]+)").unwrap(),
        Regex::new(r"(?i)N°\s*commande\s*:\s*(\d+)").unwrap(),
        Regex::new(r"(?i)Commande\s*:\s*(\d+)").unwrap(),
        Regex::new(r"(?i)N°\s*(\d{8,})").unwrap(),
    ];

    // Line-item tokens
    pub static ref QUANTITY_TOKEN: Regex = Regex::new(
        r"^\d+(?:[.,]\d+)?$"
    ).unwrap();

    pub static ref UNIT_PRICE_TOKEN: Regex = Regex::new(
        r"^\d{1,3}(?:\.\d{3})*,\d{2}$"
    ).unwrap();

    pub static ref HAS_DIGIT: Regex = Regex::new(
        r"\d"
    ).unwrap();

    // Page footers and the total line that push a product name onto the
    // next page
    pub static ref PAGE_FOOTER: Regex = Regex::new(
        r"(?i)^page\s+\d+\s*/\s*\d+$"
    ).unwrap();

    pub static ref MONTANT_TOTAL_HT: Regex = Regex::new(
        r"(?i)montant\s+total\s+ht"
    ).unwrap();

    // Phrases whose tail names the site's city
    pub static ref PLACE_TRIGGER_PHRASES: Vec<Regex> = vec![
        Regex::new(r"(?i)POSTE\s+ELECTRIQUE\s+DE\s+([^\n.,]+)").unwrap(),
        Regex::new(r"(?i)POSTE\s+RTE\s+DE\s+([^\n.,]+)").unwrap(),
    ];
}
