//! Two-sheet spreadsheet export.
//!
//! "Items" holds one row per line item, "Informations globales" the
//! document-wide fields. Headers are the captions the downstream team
//! works with, hence the French.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::{info, warn};

use crate::error::ExportError;
use crate::models::order::{HeaderFields, OrderData};
use crate::order::rules::clean_number;

/// Write `result` to `target` and return the path actually written.
///
/// When `target` exists but cannot be opened for writing, a timestamp
/// suffix is inserted before the extension instead of failing.
pub fn export_xlsx(result: &OrderData, target: &Path) -> Result<PathBuf, ExportError> {
    let target = writable_path(target);
    let mut workbook = Workbook::new();

    let city = match &result.header {
        HeaderFields::City { city } => Some(city.clone().unwrap_or_default()),
        HeaderFields::ObjectAndZone { .. } => None,
    };

    {
        let sheet = workbook.add_worksheet().set_name("Items")?;
        let mut headers = vec!["Numéro de commande"];
        if city.is_some() {
            headers.push("Ville");
        }
        headers.extend([
            "Position",
            "Référence",
            "Désignation",
            "Quantité",
            "Unité",
            "Prix unitaire",
            "Date de livraison",
        ]);

        let mut rows: Vec<Vec<String>> = Vec::with_capacity(result.items.len());
        for item in &result.items {
            let mut row = vec![result.order_number.clone().unwrap_or_default()];
            if let Some(city) = &city {
                row.push(city.clone());
            }
            row.extend([
                item.position.clone(),
                item.designation.clone(),
                item.product_name.clone().unwrap_or_default(),
                item.quantity.as_deref().map(clean_number).unwrap_or_default(),
                item.unit.clone().unwrap_or_default(),
                item.unit_price.as_deref().map(clean_number).unwrap_or_default(),
                item.delivery_date.clone().unwrap_or_default(),
            ]);
            rows.push(row);
        }
        write_sheet(sheet, &headers, &rows)?;
    }

    {
        let sheet = workbook.add_worksheet().set_name("Informations globales")?;
        let total = result.total_ht.as_deref().map(clean_number).unwrap_or_default();
        let order = result.order_number.clone().unwrap_or_default();

        let (headers, row) = match &result.header {
            HeaderFields::City { city } => (
                vec!["Numéro de commande", "Ville", "Total HT"],
                vec![order, city.clone().unwrap_or_default(), total],
            ),
            HeaderFields::ObjectAndZone {
                object_lines,
                delivery_place_lines,
            } => (
                vec!["Numéro de commande", "Objet", "Lieu de livraison", "Total HT"],
                vec![
                    order,
                    object_lines.join("\n"),
                    delivery_place_lines.join("\n"),
                    total,
                ],
            ),
        };
        write_sheet(sheet, &headers, &[row])?;
    }

    workbook.save(&target)?;
    info!(path = %target.display(), "workbook written");
    Ok(target)
}

/// Write a header row plus data rows and size every column to its longest
/// cell content.
fn write_sheet(
    sheet: &mut Worksheet,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<(), ExportError> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (row_index, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            sheet.write_string(row_index as u32 + 1, col as u16, value)?;
            let longest_line = value.lines().map(|l| l.chars().count()).max().unwrap_or(0);
            if col < widths.len() && longest_line > widths[col] {
                widths[col] = longest_line;
            }
        }
    }
    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, (*width + 2) as f64)?;
    }
    Ok(())
}

/// The target itself when writable, otherwise a timestamp-suffixed sibling.
fn writable_path(target: &Path) -> PathBuf {
    if !target.exists() {
        return target.to_path_buf();
    }
    match OpenOptions::new().append(true).open(target) {
        Ok(_) => target.to_path_buf(),
        Err(_) => {
            let stem = target
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let extension = target
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            let stamp = Local::now().format("_%Y-%m-%d_%H-%M-%S");
            let renamed = target.with_file_name(format!("{stem}{stamp}{extension}"));
            warn!(
                locked = %target.display(),
                using = %renamed.display(),
                "target file locked, writing under a new name"
            );
            renamed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::LineItem;

    fn sample_result() -> OrderData {
        OrderData {
            items: vec![LineItem {
                product_name: Some("Disjoncteur".to_string()),
                quantity: Some("2,00".to_string()),
                unit: Some("U".to_string()),
                unit_price: Some("1.200,50".to_string()),
                delivery_date: Some("15.07.2024".to_string()),
                ..LineItem::new("1", "1001")
            }],
            total_ht: Some("2.401,00".to_string()),
            order_number: Some("4500791137".to_string()),
            header: HeaderFields::City {
                city: Some("Marseille".to_string()),
            },
        }
    }

    #[test]
    fn test_export_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("commande.xlsx");

        let written = export_xlsx(&sample_result(), &target).unwrap();
        assert_eq!(written, target);
        assert!(written.exists());
    }

    #[test]
    fn test_export_object_and_zone_variant() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("commande.xlsx");
        let mut result = sample_result();
        result.header = HeaderFields::ObjectAndZone {
            object_lines: vec!["Construction poste".to_string()],
            delivery_place_lines: vec!["Chantier Nord".to_string()],
        };

        assert!(export_xlsx(&result, &target).is_ok());
    }

    #[test]
    fn test_locked_target_gets_timestamp_suffix() {
        let dir = tempfile::tempdir().unwrap();
        // a directory at the target path can never be opened for writing
        let target = dir.path().join("commande.xlsx");
        std::fs::create_dir(&target).unwrap();

        let renamed = writable_path(&target);
        assert_ne!(renamed, target);
        let name = renamed.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("commande_"));
        assert!(name.ends_with(".xlsx"));
    }
}
