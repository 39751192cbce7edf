//! Excel workbook export of combined result sections.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use super::OutputError;

/// Name of the worksheet holding the combined items.
pub const SHEET_NAME: &str = "Combined Results";

/// Write `items` to a workbook at `path`: a single sheet with a bold `URL`
/// header in A1 and one item per row below it.
///
/// # Errors
///
/// Returns `OutputError::Xlsx` if a cell cannot be written (more rows than
/// a worksheet holds, an item longer than a cell allows) or the file
/// cannot be saved.
pub fn write_url_workbook(path: &Path, items: &[String]) -> Result<(), OutputError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet().set_name(SHEET_NAME)?;
    worksheet.write_string_with_format(0, 0, "URL", &header)?;
    for (row, item) in (1u32..).zip(items) {
        worksheet.write_string(row, 0, item)?;
    }
    let width = items
        .iter()
        .map(|item| item.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(10, 100);
    worksheet.set_column_width(0, width as f64)?;

    workbook.save(path)?;
    Ok(())
}
