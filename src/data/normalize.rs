use super::model::{Catalog, ColumnRef, ColumnSchema, KnownColumn, RawTable, TitleRecord, TitleType};

/// Default for a missing or blank country / genre.
pub const UNKNOWN: &str = "Unknown";

// ---------------------------------------------------------------------------
// Field cleaners
// ---------------------------------------------------------------------------

/// First listed country, trimmed. Blank, `nan` or missing become `"Unknown"`.
pub fn normalize_country(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return UNKNOWN.to_string();
    };
    let stripped = raw.trim().trim_start_matches(',').trim();
    if stripped.eq_ignore_ascii_case("nan") {
        return UNKNOWN.to_string();
    }
    match stripped.split(',').next().map(str::trim) {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Split a comma-separated cell into trimmed, non-empty tokens.
pub fn split_tokens(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Genre tokens; a title with no usable genre gets the single token `"Unknown"`.
pub fn normalize_genres(raw: Option<&str>) -> Vec<String> {
    let tokens = split_tokens(raw);
    if tokens.is_empty() {
        vec![UNKNOWN.to_string()]
    } else {
        tokens
    }
}

/// Integer year, accepting whole-number floats such as `"2005.0"`.
pub fn parse_release_year(raw: Option<&str>) -> Option<i32> {
    let s = raw?.trim();
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Table → Catalog
// ---------------------------------------------------------------------------

/// Stray index columns written by dataframe libraries.
fn is_index_artifact(header: &str) -> bool {
    header.starts_with("Unnamed")
}

/// Resolve the schema once, then clean every row.
///
/// Never fails: every malformed field degrades to its documented default.
pub fn normalize(table: &RawTable) -> Catalog {
    let mut schema = ColumnSchema::default();
    let mut columns = Vec::new();
    let mut passthrough = Vec::new();
    // (source index, destination)
    let mut sources: Vec<(usize, ColumnRef)> = Vec::new();

    for (idx, header) in table.headers.iter().enumerate() {
        if is_index_artifact(header) {
            continue;
        }
        let col = match KnownColumn::from_header(header) {
            Some(known) if !schema.has(known) => {
                schema.mark(known);
                ColumnRef::Known(known)
            }
            _ => {
                passthrough.push(header.clone());
                ColumnRef::Passthrough(passthrough.len() - 1)
            }
        };
        columns.push(col);
        sources.push((idx, col));
    }
    for known in KnownColumn::ALWAYS_PRESENT {
        if !schema.has(known) {
            columns.push(ColumnRef::Known(known));
        }
    }

    let mut bad_years = 0usize;
    let records = table
        .rows
        .iter()
        .enumerate()
        .map(|(id, row)| {
            let mut known: [Option<&str>; 7] = [None; 7];
            let mut extras = vec![None; passthrough.len()];
            for (idx, col) in &sources {
                let cell = row.get(*idx).and_then(|c| c.as_deref());
                match col {
                    ColumnRef::Known(k) => known[*k as usize] = cell,
                    ColumnRef::Passthrough(p) => extras[*p] = cell.map(str::to_string),
                }
            }
            let get = |k: KnownColumn| known[k as usize];

            let year_cell = get(KnownColumn::ReleaseYear);
            let release_year = parse_release_year(year_cell);
            if release_year.is_none() && year_cell.is_some() {
                bad_years += 1;
            }

            TitleRecord {
                id,
                title: get(KnownColumn::Title).unwrap_or_default().to_string(),
                kind: TitleType::parse(get(KnownColumn::Type)),
                country: normalize_country(get(KnownColumn::Country)),
                listed_in: normalize_genres(get(KnownColumn::ListedIn)),
                cast: split_tokens(get(KnownColumn::Cast)),
                director: split_tokens(get(KnownColumn::Director)),
                release_year,
                extras,
            }
        })
        .collect();

    if bad_years > 0 {
        log::debug!("{bad_years} rows have an unparsable release_year; treated as absent");
    }

    Catalog {
        records,
        schema,
        columns,
        passthrough,
    }
}
