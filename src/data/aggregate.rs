use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::filter::FilteredView;
use super::model::{TitleRecord, TitleType};
use crate::config::DashboardConfig;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Scalar counts shown in the KPI cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub movies: usize,
    pub tv_shows: usize,
    /// Every title that is neither a movie nor a TV show (including unknown).
    pub other_types: usize,
    pub distinct_countries: usize,
    pub distinct_genres: usize,
}

/// One bar of a frequency chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequency {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Token sequences that can be exploded into a top-N table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenField {
    Genre,
    Director,
    Actor,
}

impl TokenField {
    fn tokens(self, rec: &TitleRecord) -> &[String] {
        match self {
            TokenField::Genre => &rec.listed_in,
            TokenField::Director => &rec.director,
            TokenField::Actor => &rec.cast,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let mut summary = Summary {
        total: view.len(),
        ..Default::default()
    };
    let mut countries = BTreeSet::new();
    let mut genres = BTreeSet::new();

    for rec in view.iter() {
        match rec.kind {
            TitleType::Movie => summary.movies += 1,
            TitleType::TvShow => summary.tv_shows += 1,
            _ => summary.other_types += 1,
        }
        countries.insert(rec.country.as_str());
        genres.extend(rec.listed_in.iter().map(String::as_str));
    }

    summary.distinct_countries = countries.len();
    summary.distinct_genres = genres.len();
    summary
}

/// Count occurrences, most frequent first. Ties keep first-seen order.
pub fn count_frequencies<'t>(tokens: impl IntoIterator<Item = &'t str>) -> Vec<Frequency> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<Frequency> = Vec::new();
    for tok in tokens {
        match slots.get(tok) {
            Some(&slot) => out[slot].count += 1,
            None => {
                slots.insert(tok, out.len());
                out.push(Frequency {
                    label: tok.to_string(),
                    count: 1,
                });
            }
        }
    }
    // Stable sort keeps insertion order among equal counts.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Titles per type value. Empty when the source had no `type` column.
/// Titles with a missing type are left out of the chart (they still count
/// as "other" in [`Summary`]).
pub fn type_distribution(view: &FilteredView<'_>) -> Vec<Frequency> {
    if !view.schema().has_type {
        return Vec::new();
    }
    let labels: Vec<String> = view
        .iter()
        .filter(|r| r.kind != TitleType::Unknown)
        .map(|r| r.kind.to_string())
        .collect();
    count_frequencies(labels.iter().map(String::as_str))
}

/// Titles per release year from `floor` onwards, ascending by year.
/// Titles without a year are left out.
pub fn year_histogram(view: &FilteredView<'_>, floor: i32) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for year in view.iter().filter_map(|r| r.release_year) {
        if year >= floor {
            *counts.entry(year).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Explode a token field over the view and keep the `n` most frequent.
pub fn top_tokens(view: &FilteredView<'_>, field: TokenField, n: usize) -> Vec<Frequency> {
    let mut freq = count_frequencies(
        view.iter()
            .flat_map(|rec| field.tokens(rec).iter().map(String::as_str)),
    );
    freq.truncate(n);
    freq
}

// ---------------------------------------------------------------------------
// Dashboard – everything the presentation layer needs for one cycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub summary: Summary,
    pub types: Vec<Frequency>,
    pub years: Vec<YearCount>,
    pub top_genres: Vec<Frequency>,
    pub top_directors: Vec<Frequency>,
    pub top_actors: Vec<Frequency>,
}

impl Dashboard {
    /// Each aggregate is computed independently from the view.
    pub fn compute(view: &FilteredView<'_>, config: &DashboardConfig) -> Self {
        Self {
            summary: summarize(view),
            types: type_distribution(view),
            years: year_histogram(view, config.year_floor),
            top_genres: top_tokens(view, TokenField::Genre, config.top_genres),
            top_directors: top_tokens(view, TokenField::Director, config.top_directors),
            top_actors: top_tokens(view, TokenField::Actor, config.top_actors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterSelection, apply};
    use crate::data::model::Catalog;
    use crate::data::normalize::normalize;
    use crate::data::normalize::tests::{scenario_table, table};

    fn freq(label: &str, count: usize) -> Frequency {
        Frequency {
            label: label.to_string(),
            count,
        }
    }

    fn crew_catalog() -> Catalog {
        normalize(&table(
            &["title", "type", "listed_in", "director", "cast", "release_year"],
            &[
                &[Some("1"), Some("Movie"), Some("Dramas"), Some("Ann"), Some("P, Q"), Some("1998")],
                &[Some("2"), Some("Movie"), Some("Comedies"), Some("Bob"), Some("Q, R"), Some("2001")],
                &[Some("3"), Some("TV Show"), Some("Dramas, Kids"), Some("Bob, Ann"), Some("R"), Some("2001")],
                &[Some("4"), Some("Special"), Some("Kids"), None, Some("Q"), Some("2003")],
                &[Some("5"), None, None, Some("Cid"), None, None],
            ],
        ))
    }

    #[test]
    fn scenario_movie_selection_counts() {
        let catalog = normalize(&scenario_table());
        let selection = FilterSelection {
            kind: Some(TitleType::Movie),
            ..Default::default()
        };
        let summary = summarize(&apply(&catalog, &selection));
        assert_eq!(summary.total, 1);
        assert_eq!(summary.movies, 1);
        assert_eq!(summary.tv_shows, 0);
    }

    #[test]
    fn summary_partitions_by_type() {
        let catalog = crew_catalog();
        let summary = summarize(&FilteredView::all(&catalog));
        assert_eq!(summary.total, 5);
        assert_eq!(summary.movies, 2);
        assert_eq!(summary.tv_shows, 1);
        assert_eq!(summary.other_types, 2);
        assert_eq!(summary.total, summary.movies + summary.tv_shows + summary.other_types);
        assert_eq!(summary.distinct_countries, 1);
        // Dramas, Comedies, Kids, Unknown
        assert_eq!(summary.distinct_genres, 4);
    }

    #[test]
    fn frequencies_break_ties_by_first_seen() {
        let freq_table = count_frequencies(["b", "a", "c", "a", "b", "d"]);
        assert_eq!(
            freq_table,
            vec![freq("b", 2), freq("a", 2), freq("c", 1), freq("d", 1)]
        );
    }

    #[test]
    fn top_tables_are_sorted_and_truncated() {
        let catalog = crew_catalog();
        let view = FilteredView::all(&catalog);

        let actors = top_tokens(&view, TokenField::Actor, 2);
        assert_eq!(actors, vec![freq("Q", 3), freq("R", 2)]);

        let directors = top_tokens(&view, TokenField::Director, 10);
        assert_eq!(
            directors,
            vec![freq("Ann", 2), freq("Bob", 2), freq("Cid", 1)]
        );

        let genres = top_tokens(&view, TokenField::Genre, 10);
        assert!(genres.len() <= 10);
        assert!(genres.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(genres[0], freq("Dramas", 2));
    }

    #[test]
    fn year_histogram_applies_floor_and_sorts() {
        let catalog = crew_catalog();
        let years = year_histogram(&FilteredView::all(&catalog), 2000);
        assert_eq!(
            years,
            vec![
                YearCount { year: 2001, count: 2 },
                YearCount { year: 2003, count: 1 },
            ]
        );
    }

    #[test]
    fn type_distribution_uses_display_names() {
        let catalog = crew_catalog();
        let types = type_distribution(&FilteredView::all(&catalog));
        assert_eq!(
            types,
            vec![freq("Movie", 2), freq("TV Show", 1), freq("Special", 1)]
        );
    }

    #[test]
    fn type_distribution_skips_missing_types() {
        let catalog = crew_catalog();
        let view = FilteredView::all(&catalog);
        let charted: usize = type_distribution(&view).iter().map(|f| f.count).sum();
        assert_eq!(charted, 4);
        assert!(type_distribution(&view).iter().all(|f| f.label != "Unknown"));
        assert_eq!(summarize(&view).total, 5);
    }

    #[test]
    fn type_distribution_needs_type_column() {
        let catalog = normalize(&table(&["title"], &[&[Some("T")]]));
        assert!(type_distribution(&FilteredView::all(&catalog)).is_empty());
        assert_eq!(summarize(&FilteredView::all(&catalog)).other_types, 1);
    }

    #[test]
    fn empty_view_yields_empty_aggregates() {
        let catalog = crew_catalog();
        let selection = FilterSelection {
            title_query: "no such title".to_string(),
            ..Default::default()
        };
        let view = apply(&catalog, &selection);
        assert!(view.is_empty());

        let dashboard = Dashboard::compute(&view, &DashboardConfig::default());
        assert_eq!(dashboard.summary, Summary::default());
        assert!(dashboard.types.is_empty());
        assert!(dashboard.years.is_empty());
        assert!(dashboard.top_genres.is_empty());
        assert!(dashboard.top_directors.is_empty());
        assert!(dashboard.top_actors.is_empty());
    }

    #[test]
    fn dashboard_respects_configured_limits() {
        let catalog = crew_catalog();
        let config = DashboardConfig {
            top_actors: 1,
            year_floor: 2002,
            ..Default::default()
        };
        let dashboard = Dashboard::compute(&FilteredView::all(&catalog), &config);
        assert_eq!(dashboard.top_actors, vec![freq("Q", 3)]);
        assert_eq!(dashboard.years, vec![YearCount { year: 2003, count: 1 }]);
    }
}
