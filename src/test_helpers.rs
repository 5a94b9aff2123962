//! Shared test utilities.
//!
//! Builds in-memory catalogs and writes real fixture files (CSV, xlsx, JPEG)
//! into temp directories, so loader and imaging tests exercise the same code
//! paths as production.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = write_csv_catalog(tmp.path(), &[("Milk", "Dairy", "l", "milk.jpg")]);
//! let catalog = crate::catalog::load_catalog(&path);
//! assert_eq!(catalog, catalog_of(&[("Milk", "Dairy", "l", "milk.jpg")]));
//! ```

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use crate::catalog::{Catalog, ProductRecord};

/// `(name, category, unit, image reference)`
pub type Row<'a> = (&'a str, &'a str, &'a str, &'a str);

const HEADER: [&str; 4] = ["Name", "Category", "Unit", "ImageReference"];

/// Catalog with the given products and no warning.
pub fn catalog_of(rows: &[Row]) -> Catalog {
    Catalog::new(
        rows.iter()
            .map(|(name, category, unit, image)| ProductRecord::new(*name, *category, *unit, *image))
            .collect(),
    )
}

/// Write `products.csv` with an English header row into `dir`.
pub fn write_csv_catalog(dir: &Path, rows: &[Row]) -> PathBuf {
    let path = dir.join("products.csv");
    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer.write_record(HEADER).unwrap();
    for (name, category, unit, image) in rows {
        writer.write_record([name, category, unit, image]).unwrap();
    }
    writer.flush().unwrap();
    path
}

/// Write `products.xlsx` with an English header row into `dir`.
pub fn write_xlsx_catalog(dir: &Path, rows: &[Row]) -> PathBuf {
    let path = dir.join("products.xlsx");
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }
    for (i, (name, category, unit, image)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in [name, category, unit, image].into_iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(row, col as u16, *value).unwrap();
            }
        }
    }
    workbook.save(&path).unwrap();
    path
}

/// Write a gradient JPEG of the given size.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(path).unwrap();
}
