//! Extraction result models.
//!
//! Field values stay locale-formatted strings exactly as they appear in the
//! document (French decimal comma, dotted thousands). Wire names match the
//! upstream JSON contract, hence the French serde renames.

use serde::{Deserialize, Serialize};

/// One product/position row detected on the purchase order.
///
/// `position` and `designation` are the detection trigger and are always
/// present; every other field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Sequence token, unique within a document, numeric-sortable.
    pub position: String,

    /// Reference code token.
    pub designation: String,

    /// Free-text product name, if resolved.
    #[serde(rename = "nom_produit")]
    pub product_name: Option<String>,

    /// Locale-formatted quantity.
    #[serde(rename = "quantite")]
    pub quantity: Option<String>,

    /// Short unit token following the quantity.
    #[serde(rename = "unite")]
    pub unit: Option<String>,

    /// Unit price, French decimal comma with optional thousands dots.
    #[serde(rename = "prix_unitaire")]
    pub unit_price: Option<String>,

    /// `dd.mm.yyyy` or `dd/mm/yyyy`; backfilled from the document's global
    /// delivery date when the item line carries none.
    #[serde(rename = "date_livraison")]
    pub delivery_date: Option<String>,
}

impl LineItem {
    /// Create an item from its trigger-line tokens.
    pub fn new(position: impl Into<String>, designation: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            designation: designation.into(),
            ..Self::default()
        }
    }
}

/// Header fields, shaped by the configured strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderFields {
    /// A geocoding-validated city name.
    City {
        #[serde(rename = "ville")]
        city: Option<String>,
    },

    /// Free-text subject lines plus the cropped delivery-place block.
    ObjectAndZone {
        #[serde(rename = "objet")]
        object_lines: Vec<String>,
        #[serde(rename = "lieu_livraison")]
        delivery_place_lines: Vec<String>,
    },
}

/// Aggregated result of parsing one purchase-order document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderData {
    /// Items in page order, then in-page order.
    pub items: Vec<LineItem>,

    /// Pre-tax total, first "total" line match.
    pub total_ht: Option<String>,

    /// Order/contract number.
    #[serde(rename = "numero_commande")]
    pub order_number: Option<String>,

    /// Strategy-dependent header fields.
    #[serde(flatten)]
    pub header: HeaderFields,
}
