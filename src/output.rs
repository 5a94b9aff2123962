//! CLI output for the `check` command.
//!
//! # Information-First Display
//!
//! Each product is listed by its position and name, with category, unit and
//! image status as indented context lines. The listing reads as a catalog
//! inventory and still lets users trace a product back to its image file.
//!
//! ```text
//! Catalog: products.xlsx (3 products)
//! 001 Apples
//!     Fruit | kg
//! 002 Milk
//!     Dairy | l
//!     Image: milk.jpg
//! 003 Cheese
//!     Dairy | kg
//!     Image: cheese.jpg (missing)
//!
//! Images: 1 found, 1 missing, 1 without reference
//! ```
//!
//! A degraded catalog prints its warning instead of the listing.
//!
//! # Architecture
//!
//! [`format_check_output`] returns `Vec<String>` for testability and
//! [`print_check_output`] writes it to stdout. The format function takes the
//! image lookup as a closure so it never touches the filesystem itself.

use crate::catalog::Catalog;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Context line joining the non-empty fields with ` | `.
fn details_line(category: &str, unit: &str) -> Option<String> {
    let parts: Vec<&str> = [category, unit]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    (!parts.is_empty()).then(|| format!("{}{}", indent(1), parts.join(" | ")))
}

#[derive(Debug, Default, PartialEq)]
struct ImageTally {
    found: usize,
    missing: usize,
    unreferenced: usize,
}

pub fn format_check_output(
    catalog: &Catalog,
    source: &Path,
    image_exists: impl Fn(&str) -> bool,
) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(warning) = &catalog.warning {
        lines.push(format!("Warning: {warning}"));
        return lines;
    }

    lines.push(format!(
        "Catalog: {} ({})",
        source.display(),
        pluralize(catalog.len(), "product")
    ));

    let mut tally = ImageTally::default();
    for (i, product) in catalog.products.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), product.name));
        lines.extend(details_line(&product.category, &product.unit));

        if product.image.is_empty() {
            tally.unreferenced += 1;
        } else if image_exists(&product.image) {
            tally.found += 1;
            lines.push(format!("{}Image: {}", indent(1), product.image));
        } else {
            tally.missing += 1;
            lines.push(format!("{}Image: {} (missing)", indent(1), product.image));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Images: {} found, {} missing, {} without reference",
        tally.found, tally.missing, tally.unreferenced
    ));
    lines
}

pub fn print_check_output(catalog: &Catalog, source: &Path, image_exists: impl Fn(&str) -> bool) {
    for line in format_check_output(catalog, source, image_exists) {
        println!("{}", line);
    }
}
