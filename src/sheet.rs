use std::{
  io::Cursor,
  sync::{Mutex, PoisonError},
};

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use itertools::Itertools;
use rust_xlsxwriter::Workbook;

use crate::{
  error::EngineError,
  model::{RowUpdate, SheetRow},
};

// Result columns, matching the fixed output columns of the pricing sheet
// (AY through BB).
const COL_ORIGINAL_PRICE: u16 = 50;
const COL_DISCOUNTED_PRICE: u16 = 51;
const COL_THC_CONTENT: u16 = 52;
const COL_PRODUCT_URL: u16 = 53;

const REQUIRED_COLUMNS: [&str; 4] = ["Category", "Brand", "Weight", "Product Name"];

/// Per-row persistence boundary of the engine. Rows are immutable once
/// parsed; updates go through interior mutability so a run can write while
/// the API holds the same store.
pub trait SheetStore: Send + Sync {
  fn rows(&self) -> &[SheetRow];
  fn write_row(&self, index: usize, update: RowUpdate);
}

/// An uploaded pricing workbook held in memory: the original cell grid for
/// passthrough, the parsed rows, and the per-row updates written by runs.
pub struct XlsxSheet {
  sheet_name: String,
  grid: Vec<Vec<String>>,
  rows: Vec<SheetRow>,
  updates: Mutex<Vec<Option<RowUpdate>>>,
}

impl XlsxSheet {
  pub fn from_bytes(bytes: &[u8], sheet_name: &str) -> Result<XlsxSheet, EngineError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook.worksheet_range(sheet_name)?;

    let grid = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>()).collect::<Vec<_>>();

    let header = grid.first().ok_or_else(|| EngineError::Sheet(format!("worksheet {sheet_name} is empty")))?;

    let columns = REQUIRED_COLUMNS
      .iter()
      .map(|name| {
        header
          .iter()
          .position(|cell| cell.trim() == *name)
          .ok_or_else(|| EngineError::Sheet(format!("worksheet {sheet_name} is missing the {name} column")))
      })
      .collect::<Result<Vec<_>, _>>()?;

    let rows = grid
      .iter()
      .skip(1)
      .map(|row| {
        let cell = |index: usize| row.get(columns[index]).cloned().unwrap_or_default();

        SheetRow {
          category: cell(0).trim().to_string(),
          brand: cell(1).trim().to_string(),
          weight: cell(2).trim().to_string(),
          product_name: cell(3).trim().to_string(),
        }
      })
      .collect::<Vec<_>>();

    tracing::info!(sheet = sheet_name, rows = rows.len(), "parsed pricing sheet");

    let updates = Mutex::new(vec![None; rows.len()]);

    Ok(XlsxSheet {
      sheet_name: sheet_name.to_string(),
      grid,
      rows,
      updates,
    })
  }

  /// Distinct categories and their row counts, for the upload summary.
  pub fn categories(&self) -> Vec<(String, usize)> {
    self
      .rows
      .iter()
      .map(|row| row.category.clone())
      .counts()
      .into_iter()
      .sorted_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs))
      .collect()
  }

  /// Render the reconciled workbook. The original grid is carried through
  /// untouched; result columns land at their fixed positions.
  pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&self.sheet_name)?;

    for (row_index, row) in self.grid.iter().enumerate() {
      for (col_index, cell) in row.iter().enumerate() {
        if !cell.is_empty() {
          worksheet.write(row_index as u32, col_index as u16, cell.as_str())?;
        }
      }
    }

    for (header, column) in [
      ("Original Price", COL_ORIGINAL_PRICE),
      ("Discounted Price", COL_DISCOUNTED_PRICE),
      ("THC", COL_THC_CONTENT),
      ("URL", COL_PRODUCT_URL),
    ] {
      worksheet.write(0, column, header)?;
    }

    let updates = self.updates.lock().unwrap_or_else(PoisonError::into_inner);

    for (index, update) in updates.iter().enumerate() {
      if let Some(update) = update {
        let row = index as u32 + 1;

        worksheet.write(row, COL_ORIGINAL_PRICE, update.original_price.as_str())?;
        worksheet.write(row, COL_DISCOUNTED_PRICE, update.discounted_price.as_str())?;
        worksheet.write(row, COL_THC_CONTENT, update.thc_content.as_str())?;
        worksheet.write(row, COL_PRODUCT_URL, update.url.as_str())?;
      }
    }

    Ok(workbook.save_to_buffer()?)
  }
}

impl SheetStore for XlsxSheet {
  fn rows(&self) -> &[SheetRow] {
    &self.rows
  }

  fn write_row(&self, index: usize, update: RowUpdate) {
    let mut updates = self.updates.lock().unwrap_or_else(PoisonError::into_inner);

    match updates.get_mut(index) {
      Some(slot) => *slot = Some(update),
      None => tracing::warn!(row = index, "write for a row outside the sheet"),
    }
  }
}

fn cell_text(cell: &Data) -> String {
  match cell {
    Data::Empty => String::new(),
    other => other.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use calamine::{Reader, Xlsx, open_workbook_from_rs};
  use rust_xlsxwriter::Workbook;

  use super::{SheetStore, XlsxSheet};
  use crate::model::RowUpdate;

  fn sample_sheet() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Pricing Research").unwrap();

    for (column, header) in ["Category", "Brand", "Weight", "Product Name"].iter().enumerate() {
      worksheet.write(0, column as u16, *header).unwrap();
    }

    for (index, row) in [
      ["FLOWER", "Acme", "3.5g", "Blue Dream 3.5g"],
      ["EDIBLE", "WANA GUMMIES", "100mg", "Gummy 10 pk Mango"],
    ]
    .iter()
    .enumerate()
    {
      for (column, cell) in row.iter().enumerate() {
        worksheet.write(index as u32 + 1, column as u16, *cell).unwrap();
      }
    }

    workbook.save_to_buffer().unwrap()
  }

  #[test]
  fn parses_rows() {
    let sheet = XlsxSheet::from_bytes(&sample_sheet(), "Pricing Research").unwrap();

    assert_eq!(sheet.rows().len(), 2);
    assert_eq!(sheet.rows()[0].product_name, "Blue Dream 3.5g");
    assert_eq!(sheet.rows()[1].brand, "WANA GUMMIES");
    assert_eq!(sheet.categories(), vec![("EDIBLE".to_string(), 1), ("FLOWER".to_string(), 1)]);
  }

  #[test]
  fn missing_sheet_is_an_error() {
    assert!(XlsxSheet::from_bytes(&sample_sheet(), "Inventory").is_err());
  }

  #[test]
  fn updates_round_trip() {
    let sheet = XlsxSheet::from_bytes(&sample_sheet(), "Pricing Research").unwrap();

    sheet.write_row(
      0,
      RowUpdate {
        discounted_price: "$25".to_string(),
        original_price: "$30".to_string(),
        thc_content: "24%".to_string(),
        url: "https://shop.example/p/blue-dream".to_string(),
      },
    );
    sheet.write_row(1, RowUpdate::placeholder());

    let bytes = sheet.to_bytes().unwrap();

    let mut workbook: Xlsx<_> = open_workbook_from_rs(std::io::Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("Pricing Research").unwrap();

    assert_eq!(range.get_value((1, 50)).unwrap().to_string(), "$30");
    assert_eq!(range.get_value((1, 51)).unwrap().to_string(), "$25");
    assert_eq!(range.get_value((1, 52)).unwrap().to_string(), "24%");
    assert_eq!(range.get_value((1, 53)).unwrap().to_string(), "https://shop.example/p/blue-dream");
    // Original cells survive the re-render.
    assert_eq!(range.get_value((1, 3)).unwrap().to_string(), "Blue Dream 3.5g");
  }
}
