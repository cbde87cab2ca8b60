use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use arrow::array::{Array, AsArray, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Catalog, RawTable};
use super::normalize::normalize;
use crate::config::DashboardConfig;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("file has no header row")]
    NoHeader,
    #[error("row {row} has {found} fields but the header has {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("expected a top-level JSON array of records")]
    NotAnArray,
    #[error("JSON row {0} is not an object")]
    NotAnObject(usize),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load, normalize and log a catalog. Any failure means no catalog at all.
pub fn load_catalog(path: &Path, config: &DashboardConfig) -> anyhow::Result<Catalog> {
    let table = load_file(path, config.delimiter_byte())
        .with_context(|| format!("loading {}", path.display()))?;
    if table.is_empty() {
        log::warn!("{} has a header but no rows", path.display());
    }
    let catalog = normalize(&table);
    log::info!(
        "Loaded {} of {} rows as titles from {} (known columns: {:?}, passthrough: {:?})",
        catalog.len(),
        table.len(),
        path.display(),
        catalog.schema.present_names(),
        catalog.passthrough,
    );
    Ok(catalog)
}

/// Read a file into a [`RawTable`]. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row, `delimiter`-separated
/// * `.tsv`  – header row, tab-separated
/// * `.json` – `[{ "title": "...", "country": "...", ... }, ...]`
/// * `.parquet` / `.pq` – one column per field
pub fn load_file(path: &Path, delimiter: u8) -> Result<RawTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_delimited(std::fs::File::open(path)?, delimiter),
        "tsv" => read_delimited(std::fs::File::open(path)?, b'\t'),
        "json" => read_json(&std::fs::read_to_string(path)?),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

fn cell(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Header row, then one record per line. Blank fields read as missing.
/// Short rows are padded; rows longer than the header are rejected.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::NoHeader);
    }

    let mut rows = Vec::new();
    let mut padded = 0usize;
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(LoadError::RaggedRow {
                row: row_no + 1,
                found: record.len(),
                expected: headers.len(),
            });
        }
        let mut row: Vec<Option<String>> = record.iter().map(cell).collect();
        if row.len() < headers.len() {
            padded += 1;
            row.resize(headers.len(), None);
        }
        rows.push(row);
    }
    if padded > 0 {
        log::debug!("{padded} short rows padded with missing cells");
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON records
// ---------------------------------------------------------------------------

fn json_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => cell(s),
        other => Some(other.to_string()),
    }
}

/// Records-oriented JSON. Headers are the union of keys in first-seen order.
pub fn read_json(text: &str) -> Result<RawTable, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root.as_array().ok_or(LoadError::NotAnArray)?;

    let mut headers: Vec<String> = Vec::new();
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or(LoadError::NotAnObject(i))?;
        for key in obj.keys() {
            if !positions.contains_key(key) {
                positions.insert(key.clone(), headers.len());
                headers.push(key.clone());
            }
        }
    }
    if headers.is_empty() && !records.is_empty() {
        return Err(LoadError::NoHeader);
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            let mut row = vec![None; headers.len()];
            for (key, val) in obj {
                if let Some(&pos) = positions.get(key) {
                    row[pos] = json_cell(val);
                }
            }
            row
        })
        .collect();

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both Pandas and Polars. String and integer
/// columns are read directly; anything else is rendered with Arrow's
/// display formatter.
fn load_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>, LoadError> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => match col.as_any().downcast_ref::<StringArray>() {
            Some(s) => s.value(row).to_string(),
            None => array_value_to_string(col.as_ref(), row)?,
        },
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => match col.as_any().downcast_ref::<Int32Array>() {
            Some(arr) => arr.value(row).to_string(),
            None => array_value_to_string(col.as_ref(), row)?,
        },
        DataType::Int64 => match col.as_any().downcast_ref::<Int64Array>() {
            Some(arr) => arr.value(row).to_string(),
            None => array_value_to_string(col.as_ref(), row)?,
        },
        _ => array_value_to_string(col.as_ref(), row)?,
    };
    Ok(cell(&value))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::TitleType;

    const NETFLIX_SAMPLE: &str = "\
show_id,type,title,director,cast,country,release_year,listed_in
s1,Movie,Dick Johnson Is Dead,Kirsten Johnson,,United States,2020,Documentaries
s2,TV Show,Blood & Water,,\"Ama Qamata, Khosi Ngema\",South Africa,2021,\"International TV Shows, TV Dramas\"
s3,TV Show,Ganglands,Julien Leclercq,\"Sami Bouajila, Tracy Gotoas\",,2021,\"Crime TV Shows, International TV Shows\"
";

    #[test]
    fn reads_quoted_multi_value_fields() {
        let table = read_delimited(NETFLIX_SAMPLE.as_bytes(), b',').unwrap();
        assert_eq!(table.headers.len(), 8);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[1][4].as_deref(), Some("Ama Qamata, Khosi Ngema"));
        assert_eq!(table.rows[0][4], None);
        assert_eq!(table.rows[2][5], None);
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_rejected() {
        let table = read_delimited("title,country\nA\n".as_bytes(), b',').unwrap();
        assert_eq!(table.rows, vec![vec![Some("A".to_string()), None]]);

        let err = read_delimited("title\nA,B\n".as_bytes(), b',').unwrap_err();
        assert!(matches!(err, LoadError::RaggedRow { row: 1, found: 2, expected: 1 }));
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(read_delimited("".as_bytes(), b','), Err(LoadError::NoHeader)));
    }

    #[test]
    fn custom_delimiter() {
        let table = read_delimited("title;country\nA;Chile, Peru\n".as_bytes(), b';').unwrap();
        assert_eq!(table.rows[0][1].as_deref(), Some("Chile, Peru"));
    }

    #[test]
    fn json_records_union_keys() {
        let table = read_json(
            r#"[{"title": "A", "release_year": 2005}, {"title": "B", "cast": null, "country": ""}]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        let col = |name: &str| table.headers.iter().position(|h| h == name).unwrap();
        assert_eq!(table.rows[0][col("release_year")].as_deref(), Some("2005"));
        assert_eq!(table.rows[1][col("cast")], None);
        assert_eq!(table.rows[1][col("country")], None);
        assert_eq!(table.rows[0][col("cast")], None);
    }

    #[test]
    fn json_must_be_array_of_objects() {
        assert!(matches!(read_json(r#"{"title": "A"}"#), Err(LoadError::NotAnArray)));
        assert!(matches!(read_json(r#"[{"title": "A"}, 3]"#), Err(LoadError::NotAnObject(1))));
        assert!(matches!(read_json("not json"), Err(LoadError::Json(_))));
    }

    #[test]
    fn load_file_dispatches_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("titles.CSV");
        std::fs::write(&csv_path, NETFLIX_SAMPLE).unwrap();
        assert_eq!(load_file(&csv_path, b',').unwrap().len(), 3);

        let tsv_path = dir.path().join("titles.tsv");
        let mut f = std::fs::File::create(&tsv_path).unwrap();
        writeln!(f, "title\tcountry").unwrap();
        writeln!(f, "A\tIndia, France").unwrap();
        drop(f);
        let table = load_file(&tsv_path, b',').unwrap();
        assert_eq!(table.rows[0][1].as_deref(), Some("India, France"));

        let txt_path = dir.path().join("titles.txt");
        std::fs::write(&txt_path, "x").unwrap();
        assert!(matches!(
            load_file(&txt_path, b','),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_catalog(Path::new("/definitely/not/here.csv"), &DashboardConfig::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("loading /definitely/not/here.csv"));
    }

    #[test]
    fn header_only_file_loads_as_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titles.csv");
        std::fs::write(&path, "title,type,country\n").unwrap();

        let table = load_file(&path, b',').unwrap();
        assert!(table.is_empty());
        let catalog = load_catalog(&path, &DashboardConfig::default()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.schema.has_type);
    }

    #[test]
    fn load_catalog_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titles.csv");
        std::fs::write(&path, NETFLIX_SAMPLE).unwrap();

        let catalog = load_catalog(&path, &DashboardConfig::default()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.passthrough, vec!["show_id"]);
        assert_eq!(catalog.records[1].kind, TitleType::TvShow);
        assert_eq!(catalog.records[1].cast, vec!["Ama Qamata", "Khosi Ngema"]);
        assert_eq!(catalog.records[2].country, "Unknown");
        assert_eq!(catalog.records[0].release_year, Some(2020));
    }

    #[test]
    fn parquet_round_trip_through_arrow_writer() {
        use arrow::array::{ArrayRef, Int64Array};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("title", DataType::Utf8, true),
            Field::new("release_year", DataType::Int64, true),
            Field::new("rating", DataType::Float64, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec![Some("A"), None])),
            Arc::new(Int64Array::from(vec![Some(2005), None])),
            Arc::new(arrow::array::Float64Array::from(vec![Some(7.5), Some(6.0)])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titles.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path, b',').unwrap();
        assert_eq!(table.headers, vec!["title", "release_year", "rating"]);
        assert_eq!(
            table.rows[0],
            vec![Some("A".to_string()), Some("2005".to_string()), Some("7.5".to_string())]
        );
        assert_eq!(table.rows[1][0], None);
        assert_eq!(table.rows[1][1], None);
    }
}
