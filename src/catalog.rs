//! Product catalog loading.
//!
//! The catalog is a table whose first row holds column headers. Spreadsheets
//! (`.xlsx`, `.xlsm`, `.xls`, `.ods`) are read with `calamine` (first
//! worksheet only), `.csv` files with the `csv` crate. Both end up as rows of
//! strings and go through the same header mapping.
//!
//! ## Columns
//!
//! | Field | Accepted headers (case-insensitive) |
//! |---|---|
//! | name | `Name`, `Nazwa` |
//! | category | `Category`, `Kategoria` |
//! | unit | `Unit`, `Jednostka` |
//! | image | `ImageReference`, `Image`, `Zdjecie` |
//!
//! Only the name column is required. Any other missing column, and any
//! empty cell, becomes `""`.
//!
//! ## Failure Handling
//!
//! Loading never fails. A missing file or an unreadable table produces an
//! empty [`Catalog`] carrying a [`CatalogWarning`]; the start screen shows the
//! warning and keeps "start review" unavailable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One row of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub category: String,
    pub unit: String,
    /// File name under the image store; empty when the product has no image.
    pub image: String,
}

impl ProductRecord {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        unit: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            unit: unit.into(),
            image: image.into(),
        }
    }
}

/// Why a catalog came back empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogWarning {
    SourceNotFound { path: PathBuf },
    ParseError { path: PathBuf, message: String },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogWarning::SourceNotFound { path } => {
                write!(f, "Catalog file not found: {}", path.display())
            }
            CatalogWarning::ParseError { path, message } => {
                write!(f, "Could not read catalog {}: {}", path.display(), message)
            }
        }
    }
}

/// Products in source row order, plus the reason the list is empty, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<ProductRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<CatalogWarning>,
}

impl Catalog {
    pub fn new(products: Vec<ProductRecord>) -> Self {
        Self {
            products,
            warning: None,
        }
    }

    fn degraded(warning: CatalogWarning) -> Self {
        Self {
            products: Vec::new(),
            warning: Some(warning),
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProductRecord> {
        self.products.get(index)
    }
}

#[derive(Error, Debug)]
enum CatalogError {
    #[error("{0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("workbook has no worksheets")]
    NoSheets,
    #[error("unsupported file type '{0}'")]
    UnsupportedFormat(String),
    #[error("no '{0}' column in the header row")]
    MissingColumn(&'static str),
}

/// Load the catalog from `path`. See the [module docs](self) for the
/// degradation rules.
pub fn load_catalog(path: &Path) -> Catalog {
    if !path.exists() {
        let warning = CatalogWarning::SourceNotFound {
            path: path.to_path_buf(),
        };
        tracing::warn!("{warning}");
        return Catalog::degraded(warning);
    }

    match read_rows(path).and_then(|rows| records_from_rows(&rows)) {
        Ok(products) => {
            tracing::info!(path = %path.display(), products = products.len(), "catalog loaded");
            Catalog::new(products)
        }
        Err(e) => {
            let warning = CatalogWarning::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            };
            tracing::warn!("{warning}");
            Catalog::degraded(warning)
        }
    }
}

fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, CatalogError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet_rows(path),
        "csv" => read_csv_rows(path),
        other => Err(CatalogError::UnsupportedFormat(other.to_string())),
    }
}

fn read_spreadsheet_rows(path: &Path) -> Result<Vec<Vec<String>>, CatalogError> {
    use calamine::{Reader, open_workbook_auto};

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(CatalogError::NoSheets)??;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

/// Coerce a spreadsheet cell to text.
///
/// Integral floats lose their fraction so numeric codes read as `48`, not `48.0`.
fn cell_to_string(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        other => other.to_string().trim().to_string(),
    }
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|s| s.trim().to_string()).collect());
    }
    Ok(rows)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Category,
    Unit,
    Image,
}

impl Column {
    fn from_header(header: &str) -> Option<Self> {
        let key: String = header
            .trim_start_matches('\u{feff}')
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "name" | "nazwa" => Some(Column::Name),
            "category" | "kategoria" => Some(Column::Category),
            "unit" | "jednostka" => Some(Column::Unit),
            "imagereference" | "image" | "zdjecie" => Some(Column::Image),
            _ => None,
        }
    }
}

/// Positions of the known columns in the header row.
#[derive(Debug, Default)]
struct ColumnMap {
    name: Option<usize>,
    category: Option<usize>,
    unit: Option<usize>,
    image: Option<usize>,
}

impl ColumnMap {
    fn from_header_row(header: &[String]) -> Self {
        let mut map = ColumnMap::default();
        for (i, cell) in header.iter().enumerate() {
            let slot = match Column::from_header(cell) {
                Some(Column::Name) => &mut map.name,
                Some(Column::Category) => &mut map.category,
                Some(Column::Unit) => &mut map.unit,
                Some(Column::Image) => &mut map.image,
                None => continue,
            };
            // First matching header wins
            slot.get_or_insert(i);
        }
        map
    }
}

fn cell_at(row: &[String], index: Option<usize>) -> String {
    index
        .and_then(|i| row.get(i))
        .cloned()
        .unwrap_or_default()
}

/// Map raw rows (header first) to product records.
fn records_from_rows(rows: &[Vec<String>]) -> Result<Vec<ProductRecord>, CatalogError> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let columns = ColumnMap::from_header_row(header);
    if columns.name.is_none() {
        return Err(CatalogError::MissingColumn("Name"));
    }

    Ok(body
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .map(|row| ProductRecord {
            name: cell_at(row, columns.name),
            category: cell_at(row, columns.category),
            unit: cell_at(row, columns.unit),
            image: cell_at(row, columns.image),
        })
        .collect())
}
