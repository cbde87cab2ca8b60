use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use super::filter::FilteredView;
use super::model::{ColumnRef, KnownColumn, TitleRecord};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Normalized value of one output column for a record.
pub fn cell_value(rec: &TitleRecord, column: ColumnRef) -> Cow<'_, str> {
    match column {
        ColumnRef::Known(known) => match known {
            KnownColumn::Title => Cow::Borrowed(&rec.title),
            KnownColumn::Type => Cow::Borrowed(rec.kind.as_source()),
            KnownColumn::Country => Cow::Borrowed(&rec.country),
            KnownColumn::ListedIn => Cow::Owned(rec.genres_joined()),
            KnownColumn::Cast => Cow::Owned(rec.cast_joined()),
            KnownColumn::Director => Cow::Owned(rec.director_joined()),
            KnownColumn::ReleaseYear => rec
                .release_year
                .map_or(Cow::Borrowed(""), |y| Cow::Owned(y.to_string())),
        },
        ColumnRef::Passthrough(i) => rec
            .extras
            .get(i)
            .and_then(|v| v.as_deref())
            .map_or(Cow::Borrowed(""), Cow::Borrowed),
    }
}

/// Serialise the view: same columns as the catalog, same row order as the view.
/// Returns the number of data rows written.
pub fn write_csv<W: Write>(
    view: &FilteredView<'_>,
    writer: W,
    delimiter: u8,
) -> Result<usize, ExportError> {
    let catalog = view.catalog();
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    wtr.write_record(catalog.header_names())?;
    for rec in view.iter() {
        wtr.write_record(
            catalog
                .columns
                .iter()
                .map(|c| cell_value(rec, *c).into_owned()),
        )?;
    }
    wtr.flush()?;
    Ok(view.len())
}

/// Write the view to a file, replacing it if present.
pub fn export_to_path(
    view: &FilteredView<'_>,
    path: &Path,
    delimiter: u8,
) -> Result<usize, ExportError> {
    let file = std::fs::File::create(path)?;
    let rows = write_csv(view, std::io::BufWriter::new(file), delimiter)?;
    log::info!("Exported {rows} titles to {}", path.display());
    Ok(rows)
}
