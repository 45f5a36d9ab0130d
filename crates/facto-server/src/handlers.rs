//! HTTP request handlers.
//!
//! Parsing is blocking work (PDF interpretation plus rate-limited geocoding
//! lookups), so it runs on the blocking pool. Every failure becomes an
//! `{error}` JSON body; stack traces never leave the process.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::{error, info};

use facto_core::order::rules::clean_number;
use facto_core::{
    export_xlsx, FactoConfig, HeaderFields, LineItem, NominatimClient, OrderData, OrderParser,
    PdfDocument,
};

use crate::types::{
    DeliveryPlaceLine, ErrorResponse, GlobalInfo, ObjetLine, StatusResponse, UploadRequest,
    UploadResponse,
};
use crate::ApiState;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn internal_error(message: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Status endpoint.
pub async fn status() -> impl IntoResponse {
    Json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Upload endpoint: base64-encoded PDF in, extracted fields as JSON out.
pub async fn upload(
    State(state): State<ApiState>,
    Json(request): Json<UploadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(filename = %request.filename, "upload received");

    let bytes = BASE64
        .decode(request.filecontent.as_bytes())
        .map_err(|err| bad_request(format!("invalid base64 payload: {err}")))?;

    let result = parse_document(state.config.clone(), bytes).await?;
    Ok(Json(build_upload_response(result)))
}

/// Convert endpoint: raw PDF bytes in, the spreadsheet as a download out.
pub async fn convert(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if body.is_empty() {
        return Err(bad_request("empty request body"));
    }

    let result = parse_document(state.config.clone(), body.to_vec()).await?;

    let workbook = tokio::task::spawn_blocking(move || -> facto_core::Result<Vec<u8>> {
        let dir = tempfile::tempdir()?;
        let written = export_xlsx(&result, &dir.path().join("commande.xlsx"))?;
        Ok(std::fs::read(written)?)
    })
    .await
    .map_err(|err| {
        error!(%err, "export task panicked");
        internal_error("internal error")
    })?
    .map_err(|err| bad_request(err.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"commande.xlsx\"".to_string(),
            ),
        ],
        workbook,
    ))
}

/// Run the blocking parse on the blocking pool.
async fn parse_document(config: Arc<FactoConfig>, bytes: Vec<u8>) -> Result<OrderData, ApiError> {
    tokio::task::spawn_blocking(move || -> facto_core::Result<OrderData> {
        let document = PdfDocument::load_mem(&bytes)?;
        let geocoder = NominatimClient::new(&config.geocoding)?;
        let parser = OrderParser::new(&config, &geocoder);
        parser.parse(&document)
    })
    .await
    .map_err(|err| {
        error!(%err, "parse task panicked");
        internal_error("internal error")
    })?
    .map_err(|err| bad_request(err.to_string()))
}

/// Shape the parse result into the wire response, cleaning numeric fields.
fn build_upload_response(result: OrderData) -> UploadResponse {
    let items = result.items.into_iter().map(clean_item).collect();
    let total_ht = result.total_ht.as_deref().map(clean_number);

    let (ville, objet, lieu_livraison) = match result.header {
        HeaderFields::City { city } => (city, None, None),
        HeaderFields::ObjectAndZone {
            object_lines,
            delivery_place_lines,
        } => (
            None,
            Some(
                object_lines
                    .into_iter()
                    .map(|line| ObjetLine { objet: line })
                    .collect(),
            ),
            Some(
                delivery_place_lines
                    .into_iter()
                    .map(|line| DeliveryPlaceLine {
                        lieu_livraison: line,
                    })
                    .collect(),
            ),
        ),
    };

    UploadResponse {
        items,
        globalite: GlobalInfo {
            numero_commande: result.order_number,
            total_ht,
            ville,
        },
        objet,
        lieu_livraison,
    }
}

fn clean_item(mut item: LineItem) -> LineItem {
    item.quantity = item.quantity.as_deref().map(clean_number);
    item.unit_price = item.unit_price.as_deref().map(clean_number);
    item
}
