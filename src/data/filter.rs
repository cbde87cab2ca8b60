use std::borrow::Cow;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::model::{Catalog, ColumnSchema, TitleRecord, TitleType};

// ---------------------------------------------------------------------------
// Filter selection: one immutable snapshot per interaction
// ---------------------------------------------------------------------------

/// The user's current filter choices.
///
/// Every empty field means "no constraint". The UI edits a copy and hands
/// the whole value back, so replacing it (including reset) is atomic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    /// `None` = "All".
    pub kind: Option<TitleType>,
    /// Exact match against the record's single country.
    pub countries: BTreeSet<String>,
    /// Case-insensitive substring match against the joined genres, OR'ed.
    pub genres: BTreeSet<String>,
    pub title_query: String,
    pub actor_query: String,
}

impl FilterSelection {
    /// Whether nothing is being filtered.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Lower-cased, ready-to-match form of a selection.
struct Predicates<'s> {
    kind: Option<&'s TitleType>,
    countries: BTreeSet<&'s str>,
    genres: Vec<String>,
    title: Option<String>,
    actor: Option<String>,
}

impl<'s> Predicates<'s> {
    fn new(selection: &'s FilterSelection, schema: &ColumnSchema) -> Self {
        let lower = |q: &str| (!q.is_empty()).then(|| q.to_lowercase());
        Self {
            // An absent source column disables its predicate family.
            kind: selection.kind.as_ref().filter(|_| schema.has_type),
            countries: selection.countries.iter().map(|c| c.trim()).collect(),
            genres: selection.genres.iter().map(|g| g.to_lowercase()).collect(),
            title: lower(&selection.title_query).filter(|_| schema.has_title),
            actor: lower(&selection.actor_query),
        }
    }

    fn matches(&self, rec: &TitleRecord) -> bool {
        if let Some(kind) = self.kind {
            if rec.kind != *kind {
                return false;
            }
        }
        if !self.countries.is_empty() && !self.countries.contains(rec.country.as_str()) {
            return false;
        }
        if !self.genres.is_empty() {
            let joined = rec.genres_joined().to_lowercase();
            if !self.genres.iter().any(|g| joined.contains(g.as_str())) {
                return false;
            }
        }
        if let Some(q) = &self.title {
            if !rec.title.to_lowercase().contains(q.as_str()) {
                return false;
            }
        }
        if let Some(q) = &self.actor {
            if !rec.cast_joined().to_lowercase().contains(q.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Return indices of titles that pass every active predicate.
pub fn filtered_indices(catalog: &Catalog, selection: &FilterSelection) -> Vec<usize> {
    let predicates = Predicates::new(selection, &catalog.schema);
    catalog
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| predicates.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Filter the catalog into a view. Pure: the catalog is never touched.
pub fn apply<'a>(catalog: &'a Catalog, selection: &FilterSelection) -> FilteredView<'a> {
    FilteredView {
        catalog,
        indices: Cow::Owned(filtered_indices(catalog, selection)),
    }
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

/// Titles of a catalog that passed a selection, in source order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    catalog: &'a Catalog,
    indices: Cow<'a, [usize]>,
}

impl<'a> FilteredView<'a> {
    /// View over the whole catalog.
    pub fn all(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            indices: Cow::Owned((0..catalog.len()).collect()),
        }
    }

    /// View over indices computed earlier by [`filtered_indices`].
    pub fn from_indices(catalog: &'a Catalog, indices: &'a [usize]) -> Self {
        Self {
            catalog,
            indices: Cow::Borrowed(indices),
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn schema(&self) -> &'a ColumnSchema {
        &self.catalog.schema
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices.into_owned()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<&'a TitleRecord> {
        let catalog = self.catalog;
        self.indices.get(pos).and_then(|&i| catalog.records.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TitleRecord> + '_ {
        let catalog = self.catalog;
        self.indices.iter().filter_map(move |&i| catalog.records.get(i))
    }
}

// ---------------------------------------------------------------------------
// Filter options offered by the UI
// ---------------------------------------------------------------------------

/// Choices derived once per loaded catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    /// Distinct known types, sorted by label. Empty when the source had no
    /// `type` column.
    pub types: Vec<TitleType>,
    pub countries: Vec<String>,
    pub genres: Vec<String>,
    pub years: RangeInclusive<i32>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            countries: Vec::new(),
            genres: Vec::new(),
            years: FALLBACK_YEARS,
        }
    }
}

const FALLBACK_YEARS: RangeInclusive<i32> = 2000..=2024;

impl FilterOptions {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut types: Vec<TitleType> = Vec::new();
        let mut countries = BTreeSet::new();
        let mut genres = BTreeSet::new();
        let mut years: Option<(i32, i32)> = None;

        for rec in &catalog.records {
            if catalog.schema.has_type
                && rec.kind != TitleType::Unknown
                && !types.contains(&rec.kind)
            {
                types.push(rec.kind.clone());
            }
            countries.insert(rec.country.clone());
            genres.extend(rec.listed_in.iter().cloned());
            if let Some(y) = rec.release_year {
                years = Some(match years {
                    Some((lo, hi)) => (lo.min(y), hi.max(y)),
                    None => (y, y),
                });
            }
        }

        types.sort_by_cached_key(|t| t.to_string());

        Self {
            types,
            countries: countries.into_iter().collect(),
            genres: genres.into_iter().collect(),
            years: years.map_or(FALLBACK_YEARS, |(lo, hi)| lo..=hi),
        }
    }

    /// Whether the UI should offer a type selector at all.
    pub fn has_types(&self) -> bool {
        !self.types.is_empty()
    }
}
