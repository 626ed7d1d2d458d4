use anyhow::Result;
use std::io::Read;

use crate::application::{AppError, ShopService};
use crate::domain::{parse_cents, parse_quantity, Unit};

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub dry_run: bool,
    pub skip_existing: bool,
    pub validate_only: bool,
}

/// Importer for loading a product catalog into the shop
pub struct Importer<'a> {
    service: &'a ShopService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a ShopService) -> Self {
        Self { service }
    }

    /// Import products from CSV. Expected columns:
    /// name, buying_price, selling_price, opening_stock (optional), unit (optional).
    ///
    /// A name already in the catalog becomes a new revision (newest wins on
    /// lookup) unless `skip_existing` is set. Opening stock attaches an
    /// inventory only where the product doesn't have one yet.
    pub async fn import_products_csv<R: Read>(
        &self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut imported = 0;
        let mut skipped = 0;
        let mut errors = Vec::new();

        for (line_num, result) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let name = record.get(0).unwrap_or("").trim();
            if name.is_empty() {
                errors.push(ImportError {
                    line,
                    field: Some("name".to_string()),
                    error: "Missing product name".to_string(),
                });
                continue;
            }

            let buying = match parse_cents(record.get(1).unwrap_or("")) {
                Ok(v) => v,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("buying_price".to_string()),
                        error: format!("Invalid price: {}", e),
                    });
                    continue;
                }
            };

            let selling = match parse_cents(record.get(2).unwrap_or("")) {
                Ok(v) => v,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("selling_price".to_string()),
                        error: format!("Invalid price: {}", e),
                    });
                    continue;
                }
            };

            // Opening stock and unit are optional and travel together
            let opening = match record.get(3).map(str::trim).filter(|s| !s.is_empty()) {
                Some(raw) => match parse_quantity(raw) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        errors.push(ImportError {
                            line,
                            field: Some("opening_stock".to_string()),
                            error: format!("Invalid quantity: {}", e),
                        });
                        continue;
                    }
                },
                None => None,
            };

            let unit = match record.get(4).map(str::trim).filter(|s| !s.is_empty()) {
                Some(raw) => match Unit::from_str(raw) {
                    Some(u) => Some(u),
                    None => {
                        errors.push(ImportError {
                            line,
                            field: Some("unit".to_string()),
                            error: format!("Invalid unit: {}", raw),
                        });
                        continue;
                    }
                },
                None => None,
            };

            let exists = self.service.get_product(name).await.is_ok();
            if exists && options.skip_existing {
                skipped += 1;
                continue;
            }

            if options.dry_run || options.validate_only {
                imported += 1;
                continue;
            }

            let created = if exists {
                self.service
                    .revise_product(name.to_string(), buying, selling)
                    .await
            } else {
                self.service
                    .create_product(name.to_string(), buying, selling)
                    .await
            };

            if let Err(e) = created {
                errors.push(ImportError {
                    line,
                    field: None,
                    error: format!("Product import failed: {}", e),
                });
                continue;
            }

            if let (Some(opening), Some(unit)) = (opening, unit) {
                match self.service.attach_inventory(name, opening, unit).await {
                    Ok(_) => {}
                    // An existing inventory keeps its stock; the row itself imported fine
                    Err(AppError::DuplicateInventory(_)) => {}
                    Err(e) => {
                        errors.push(ImportError {
                            line,
                            field: Some("opening_stock".to_string()),
                            error: format!("Inventory import failed: {}", e),
                        });
                        continue;
                    }
                }
            }

            imported += 1;
        }

        Ok(ImportResult {
            imported,
            skipped,
            errors,
        })
    }
}
