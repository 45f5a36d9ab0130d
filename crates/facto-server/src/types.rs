//! Request and response types for the API endpoints.

use facto_core::LineItem;
use serde::{Deserialize, Serialize};

/// Body of `POST /upload`.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    /// Original file name, informational only.
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Base64-encoded PDF content.
    pub filecontent: String,
}

fn default_filename() -> String {
    "fichier.pdf".to_string()
}

/// Successful `POST /upload` response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub items: Vec<LineItem>,
    pub globalite: GlobalInfo,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub objet: Option<Vec<ObjetLine>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lieu_livraison: Option<Vec<DeliveryPlaceLine>>,
}

/// Document-wide fields of the upload response.
#[derive(Debug, Serialize)]
pub struct GlobalInfo {
    pub numero_commande: Option<String>,
    pub total_ht: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
}

/// One subject line.
#[derive(Debug, Serialize)]
pub struct ObjetLine {
    pub objet: String,
}

/// One delivery-place line.
#[derive(Debug, Serialize)]
pub struct DeliveryPlaceLine {
    pub lieu_livraison: String,
}

/// Error body returned with any non-success status.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `GET /status` response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
}
