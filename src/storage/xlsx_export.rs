use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use std::path::Path;

use crate::error::ExportError;
use crate::models::{Field, ProductRecord};

const SHEET_NAME: &str = "Products";
const HEADER_FILL: u32 = 0x4472C4;
const MAX_COLUMN_WIDTH: usize = 50;

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_font_size(11)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
}

fn cell_format() -> Format {
    Format::new()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
}

/// Widest value in the column (header included) plus padding, capped
pub fn column_width(field: Field, records: &[ProductRecord]) -> usize {
    let longest = records
        .iter()
        .filter_map(|record| record.get(field))
        .map(|value| value.chars().count())
        .chain(std::iter::once(field.as_str().len()))
        .max()
        .unwrap_or(0);
    (longest + 2).min(MAX_COLUMN_WIDTH)
}

/// Styled workbook: coloured frozen header row, bordered wrapped cells
pub fn write_xlsx(records: &[ProductRecord], path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = header_format();
    let cell = cell_format();

    for (col, field) in Field::ALL.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, field.as_str(), &header)?;
        worksheet.set_column_width(col, column_width(*field, records) as f64)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, (_, value)) in record.iter().enumerate() {
            let col = col as u16;
            match value {
                Some(text) => worksheet.write_string_with_format(row, col, text, &cell)?,
                None => worksheet.write_blank(row, col, &cell)?,
            };
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    workbook.save(path)?;
    Ok(())
}
