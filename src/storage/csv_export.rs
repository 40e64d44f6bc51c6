use polars::prelude::*;
use std::fs::File;
use std::path::Path;

use crate::error::ExportError;
use crate::models::{Field, ProductRecord};

/// One string column per field, in record declaration order
pub fn records_to_dataframe(records: &[ProductRecord]) -> Result<DataFrame, ExportError> {
    let columns: Vec<Column> = Field::ALL
        .iter()
        .map(|&field| {
            let values: Vec<Option<&str>> = records.iter().map(|record| record.get(field)).collect();
            Series::new(field.as_str().into(), values).into()
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Write the batch as UTF-8 CSV with a header row; absent values are empty fields
pub fn write_csv(records: &[ProductRecord], path: &Path) -> Result<(), ExportError> {
    let mut df = records_to_dataframe(records)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ProductRecord> {
        vec![
            ProductRecord::new()
                .with(Field::Name, "Box of Chocolate Candy")
                .with(Field::Price, "$24.99"),
            ProductRecord::new()
                .with(Field::Name, "Teal Potion, large")
                .with(Field::Url, "/product/3"),
        ]
    }

    #[test]
    fn test_dataframe_shape_and_order() {
        let df = records_to_dataframe(&sample()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), Field::COUNT);

        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        let expected: Vec<String> = Field::ALL.iter().map(|f| f.as_str().to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        let records = sample();

        write_csv(&records, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers.len(), Field::COUNT);
        assert_eq!(headers[0], "name");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), records.len());

        for (row, record) in rows.iter().zip(&records) {
            for (index, (_, value)) in record.iter().enumerate() {
                assert_eq!(&row[index], value.unwrap_or(""));
            }
        }
    }
}
