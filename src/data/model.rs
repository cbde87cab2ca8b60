use std::fmt;

// ---------------------------------------------------------------------------
// RawTable – the file as read, before any cleaning
// ---------------------------------------------------------------------------

/// A delimited file (or equivalent) read verbatim.
///
/// Every row has exactly `headers.len()` cells. A cell is `None` when the
/// source had nothing in it (empty CSV field, JSON `null`, Parquet null).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// KnownColumn – the columns the dashboard understands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KnownColumn {
    Title,
    Type,
    Country,
    ListedIn,
    Cast,
    Director,
    ReleaseYear,
}

impl KnownColumn {
    pub const ALL: [KnownColumn; 7] = [
        KnownColumn::Title,
        KnownColumn::Type,
        KnownColumn::Country,
        KnownColumn::ListedIn,
        KnownColumn::Cast,
        KnownColumn::Director,
        KnownColumn::ReleaseYear,
    ];

    /// Columns that always exist after normalization, even when the source
    /// lacked them. Missing ones are appended to exports in this order.
    pub const ALWAYS_PRESENT: [KnownColumn; 5] = [
        KnownColumn::Country,
        KnownColumn::ListedIn,
        KnownColumn::Cast,
        KnownColumn::Director,
        KnownColumn::ReleaseYear,
    ];

    /// Header name as it appears in the source file.
    pub fn name(self) -> &'static str {
        match self {
            KnownColumn::Title => "title",
            KnownColumn::Type => "type",
            KnownColumn::Country => "country",
            KnownColumn::ListedIn => "listed_in",
            KnownColumn::Cast => "cast",
            KnownColumn::Director => "director",
            KnownColumn::ReleaseYear => "release_year",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == header)
    }
}

// ---------------------------------------------------------------------------
// ColumnSchema – which known columns the source actually had
// ---------------------------------------------------------------------------

/// Presence flags for the known columns, decided once at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnSchema {
    pub has_title: bool,
    pub has_type: bool,
    pub has_country: bool,
    pub has_listed_in: bool,
    pub has_cast: bool,
    pub has_director: bool,
    pub has_release_year: bool,
}

impl ColumnSchema {
    pub fn has(&self, column: KnownColumn) -> bool {
        match column {
            KnownColumn::Title => self.has_title,
            KnownColumn::Type => self.has_type,
            KnownColumn::Country => self.has_country,
            KnownColumn::ListedIn => self.has_listed_in,
            KnownColumn::Cast => self.has_cast,
            KnownColumn::Director => self.has_director,
            KnownColumn::ReleaseYear => self.has_release_year,
        }
    }

    pub fn mark(&mut self, column: KnownColumn) {
        let flag = match column {
            KnownColumn::Title => &mut self.has_title,
            KnownColumn::Type => &mut self.has_type,
            KnownColumn::Country => &mut self.has_country,
            KnownColumn::ListedIn => &mut self.has_listed_in,
            KnownColumn::Cast => &mut self.has_cast,
            KnownColumn::Director => &mut self.has_director,
            KnownColumn::ReleaseYear => &mut self.has_release_year,
        };
        *flag = true;
    }

    /// Names of the known columns that were present, for logging.
    pub fn present_names(&self) -> Vec<&'static str> {
        KnownColumn::ALL
            .into_iter()
            .filter(|c| self.has(*c))
            .map(KnownColumn::name)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TitleType
// ---------------------------------------------------------------------------

/// Content type of a title. Source literals are matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TitleType {
    Movie,
    TvShow,
    /// Any other non-empty value, kept as written.
    Other(String),
    /// Missing in the source (or no `type` column at all).
    Unknown,
}

impl TitleType {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => TitleType::Unknown,
            Some("Movie") => TitleType::Movie,
            Some("TV Show") => TitleType::TvShow,
            Some(other) => TitleType::Other(other.to_string()),
        }
    }

    /// Value written back on export. `Unknown` round-trips as an empty cell.
    pub fn as_source(&self) -> &str {
        match self {
            TitleType::Movie => "Movie",
            TitleType::TvShow => "TV Show",
            TitleType::Other(s) => s,
            TitleType::Unknown => "",
        }
    }
}

impl fmt::Display for TitleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleType::Unknown => write!(f, "Unknown"),
            other => write!(f, "{}", other.as_source()),
        }
    }
}

// ---------------------------------------------------------------------------
// TitleRecord – one normalized row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRecord {
    /// Row position in the source file.
    pub id: usize,
    pub title: String,
    pub kind: TitleType,
    /// First listed country, never empty and never comma-joined.
    pub country: String,
    /// Genre tokens; at least one (defaults to `["Unknown"]`).
    pub listed_in: Vec<String>,
    pub cast: Vec<String>,
    pub director: Vec<String>,
    pub release_year: Option<i32>,
    /// Unrecognised source columns, aligned with [`Catalog::passthrough`].
    pub extras: Vec<Option<String>>,
}

impl TitleRecord {
    /// Genres joined the way they appeared after cleaning.
    pub fn genres_joined(&self) -> String {
        self.listed_in.join(", ")
    }

    pub fn cast_joined(&self) -> String {
        self.cast.join(", ")
    }

    pub fn director_joined(&self) -> String {
        self.director.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Catalog – the complete normalized dataset
// ---------------------------------------------------------------------------

/// Where an output column's values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    Known(KnownColumn),
    /// Index into [`Catalog::passthrough`] and [`TitleRecord::extras`].
    Passthrough(usize),
}

/// The normalized dataset. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub records: Vec<TitleRecord>,
    pub schema: ColumnSchema,
    /// Output column order: source order, then normalized columns the
    /// source was missing.
    pub columns: Vec<ColumnRef>,
    /// Header names of the passthrough columns.
    pub passthrough: Vec<String>,
}

impl Catalog {
    /// Number of titles.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header name for an output column.
    pub fn column_name(&self, column: ColumnRef) -> &str {
        match column {
            ColumnRef::Known(k) => k.name(),
            ColumnRef::Passthrough(i) => self.passthrough.get(i).map_or("", String::as_str),
        }
    }

    /// All output header names, in order.
    pub fn header_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| self.column_name(*c).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_type_parses_source_literals_exactly() {
        assert_eq!(TitleType::parse(Some("Movie")), TitleType::Movie);
        assert_eq!(TitleType::parse(Some(" TV Show ")), TitleType::TvShow);
        assert_eq!(
            TitleType::parse(Some("movie")),
            TitleType::Other("movie".to_string())
        );
        assert_eq!(TitleType::parse(Some("   ")), TitleType::Unknown);
        assert_eq!(TitleType::parse(None), TitleType::Unknown);
    }

    #[test]
    fn title_type_display_names_unknown() {
        assert_eq!(TitleType::TvShow.to_string(), "TV Show");
        assert_eq!(TitleType::Unknown.to_string(), "Unknown");
        assert_eq!(TitleType::Unknown.as_source(), "");
    }

    #[test]
    fn known_columns_resolve_from_headers() {
        assert_eq!(KnownColumn::from_header("listed_in"), Some(KnownColumn::ListedIn));
        assert_eq!(KnownColumn::from_header("Listed_In"), None);
        assert_eq!(KnownColumn::from_header("show_id"), None);
    }

    #[test]
    fn schema_marks_and_reports_columns() {
        let mut schema = ColumnSchema::default();
        schema.mark(KnownColumn::Title);
        schema.mark(KnownColumn::ReleaseYear);
        assert!(schema.has(KnownColumn::Title));
        assert!(!schema.has(KnownColumn::Type));
        assert_eq!(schema.present_names(), vec!["title", "release_year"]);
    }
}
