//! End-to-end parser tests over in-memory collaborators.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use pretty_assertions::assert_eq;

use facto_core::error::PdfError;
use facto_core::geo::{GeocodeLookup, GeocodePlace};
use facto_core::models::config::{FactoConfig, HeaderStrategy};
use facto_core::models::order::HeaderFields;
use facto_core::pdf::{DocumentSource, Word};
use facto_core::OrderParser;

/// In-memory document: page texts plus optional positioned words.
#[derive(Default)]
struct FakeDocument {
    pages: Vec<String>,
    words: Vec<Vec<Word>>,
    failing_pages: HashSet<usize>,
    width: f64,
}

impl FakeDocument {
    fn from_pages(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            words: Vec::new(),
            failing_pages: HashSet::new(),
            width: 595.0,
        }
    }
}

impl DocumentSource for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page: usize) -> facto_core::pdf::Result<String> {
        if self.failing_pages.contains(&page) {
            return Err(PdfError::TextExtraction("damaged page".to_string()));
        }
        self.pages
            .get(page)
            .cloned()
            .ok_or(PdfError::InvalidPage(page))
    }

    fn page_width(&self, _page: usize) -> facto_core::pdf::Result<f64> {
        Ok(self.width)
    }

    fn page_words(&self, page: usize) -> facto_core::pdf::Result<Vec<Word>> {
        Ok(self.words.get(page).cloned().unwrap_or_default())
    }
}

/// Deterministic lookup with a call log.
struct FakeLookup {
    known: HashMap<String, GeocodePlace>,
    calls: RefCell<Vec<String>>,
}

impl FakeLookup {
    fn new(names: &[&str]) -> Self {
        let known = names
            .iter()
            .map(|name| {
                (
                    name.to_lowercase(),
                    GeocodePlace {
                        class: "place".to_string(),
                        kind: "city".to_string(),
                        display_name: name.to_string(),
                    },
                )
            })
            .collect();
        Self {
            known,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl GeocodeLookup for FakeLookup {
    fn lookup(&self, name: &str) -> facto_core::geo::Result<Option<GeocodePlace>> {
        self.calls.borrow_mut().push(name.to_string());
        Ok(self.known.get(&name.to_lowercase()).cloned())
    }
}

fn word(text: &str, x0: f64, top: f64) -> Word {
    let width = text.chars().count() as f64 * 5.0;
    Word {
        text: text.to_string(),
        x0,
        x1: x0 + width,
        top,
        bottom: top + 10.0,
    }
}

#[test]
fn test_two_page_document_with_deferred_product_name() {
    let page1 = "Commande N° 4500791137/ROTI\n\
                 Date de livraison : 15.07.2024\n\
                 1 1001 5 U 1.200,00\n\
                 Page 1 / 2";
    let page2 = "Montant total HT 6.000,00\n\
                 Montant HT\n\
                 Disjoncteur haute tension\n\
                 Fin de commande";

    let doc = FakeDocument::from_pages(&[page1, page2]);
    let lookup = FakeLookup::new(&[]);
    let config = FactoConfig::default();
    let parser = OrderParser::new(&config, &lookup);

    let result = parser.parse(&doc).unwrap();

    assert_eq!(result.order_number, Some("4500791137/ROTI".to_string()));
    assert_eq!(result.items.len(), 1);

    let item = &result.items[0];
    assert_eq!(item.position, "1");
    assert_eq!(item.designation, "1001");
    // the name comes from page 2, after the "Montant HT" marker
    assert_eq!(
        item.product_name,
        Some("Disjoncteur haute tension".to_string())
    );
    assert_eq!(item.quantity, Some("5".to_string()));
    assert_eq!(item.unit, Some("U".to_string()));
    assert_eq!(item.unit_price, Some("1.200,00".to_string()));
    // no date on the item line: the global delivery date backfills it
    assert_eq!(item.delivery_date, Some("15.07.2024".to_string()));

    // "Montant total HT" is the first "total" line in the concatenated text
    assert_eq!(result.total_ht, Some("6.000,00".to_string()));
    assert_eq!(result.header, HeaderFields::City { city: None });
    assert!(lookup.calls.borrow().is_empty());
}

#[test]
fn test_failing_page_is_skipped() {
    let mut doc = FakeDocument::from_pages(&[
        "Commande : 4500791137\n1 1001 2 U 10,00\nPremier produit",
        "broken",
        "3 1003 4 U 30,00\nTroisieme produit\nTotal HT 130,00",
    ]);
    doc.failing_pages.insert(1);

    let lookup = FakeLookup::new(&[]);
    let config = FactoConfig::default();
    let parser = OrderParser::new(&config, &lookup);

    let result = parser.parse(&doc).unwrap();

    let positions: Vec<&str> = result.items.iter().map(|i| i.position.as_str()).collect();
    assert_eq!(positions, vec!["1", "3"]);
    assert_eq!(result.total_ht, Some("130,00".to_string()));
}

#[test]
fn test_city_resolved_from_objet_block() {
    let mut doc = FakeDocument::from_pages(&["OBJET Travaux divers\nChantier de Marseille"]);
    doc.words = vec![vec![
        word("OBJET", 20.0, 200.0),
        word("Chantier", 20.0, 215.0),
        word("de", 70.0, 215.0),
        word("Marseille", 85.0, 215.0),
        // right column, ignored
        word("Fournisseur", 420.0, 215.0),
    ]];

    let lookup = FakeLookup::new(&["Marseille"]);
    let config = FactoConfig::default();
    let parser = OrderParser::new(&config, &lookup);

    let result = parser.parse(&doc).unwrap();
    assert_eq!(
        result.header,
        HeaderFields::City {
            city: Some("Marseille".to_string())
        }
    );
    // shape-filtered candidates ("de Marseille" and friends) never reach
    // the lookup
    assert!(lookup
        .calls
        .borrow()
        .iter()
        .all(|c| !c.starts_with("de ")));
}

#[test]
fn test_city_falls_back_to_trigger_phrase() {
    let doc = FakeDocument::from_pages(&["Travaux sur le POSTE ELECTRIQUE DE CASTELLANE\nsuite"]);
    let lookup = FakeLookup::new(&["CASTELLANE"]);
    let config = FactoConfig::default();
    let parser = OrderParser::new(&config, &lookup);

    let result = parser.parse(&doc).unwrap();
    assert_eq!(
        result.header,
        HeaderFields::City {
            city: Some("CASTELLANE".to_string())
        }
    );
}

#[test]
fn test_object_and_zone_strategy() {
    let mut config = FactoConfig::default();
    config.extraction.header_strategy = HeaderStrategy::ObjectAndZone;

    let mut doc = FakeDocument::from_pages(&["OBJET Travaux\n1 1001 2 U 10,00\nProduit"]);
    doc.words = vec![vec![
        word("OBJET", 20.0, 200.0),
        word("Construction", 20.0, 215.0),
        word("du", 85.0, 215.0),
        word("poste", 100.0, 215.0),
        word("Tranche", 20.0, 228.0),
        word("ferme", 60.0, 228.0),
        // inside the delivery-address zone (20..228 x 425..514)
        word("Adresse", 25.0, 430.0),
        word("de", 65.0, 430.0),
        word("livraison", 80.0, 430.0),
        word("Chantier", 25.0, 445.0),
        word("Nord", 70.0, 445.0),
        word("13200", 25.0, 458.0),
        word("Arles", 55.0, 458.0),
    ]];

    let lookup = FakeLookup::new(&[]);
    let parser = OrderParser::new(&config, &lookup);
    let result = parser.parse(&doc).unwrap();

    match &result.header {
        HeaderFields::ObjectAndZone {
            object_lines,
            delivery_place_lines,
        } => {
            assert_eq!(object_lines[0], "Construction du poste");
            assert_eq!(object_lines[1], "Tranche ferme");
            // boilerplate stripped, remaining lines kept in order
            assert_eq!(
                delivery_place_lines,
                &vec!["Chantier Nord".to_string(), "13200 Arles".to_string()]
            );
        }
        other => panic!("unexpected header variant: {other:?}"),
    }
    // the object-and-zone strategy never consults the geocoder
    assert!(lookup.calls.borrow().is_empty());
}

#[test]
fn test_empty_document_is_an_error() {
    let doc = FakeDocument::from_pages(&[]);
    let lookup = FakeLookup::new(&[]);
    let config = FactoConfig::default();
    let parser = OrderParser::new(&config, &lookup);

    assert!(parser.parse(&doc).is_err());
}
