use std::path::Path;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::Dashboard;
use crate::data::export::export_to_path;
use crate::data::filter::{FilterOptions, FilterSelection, FilteredView, apply};
use crate::data::loader::load_catalog;
use crate::data::model::Catalog;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded catalog (None until a file is loaded). Read-only once set.
    pub catalog: Option<Catalog>,

    /// Values offered by the filter widgets.
    pub options: FilterOptions,

    /// The selection the current view was computed from.
    pub selection: FilterSelection,

    /// Indices of titles passing `selection` (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregates over the visible titles (cached).
    pub dashboard: Dashboard,

    /// Stable colours per content type.
    pub type_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            catalog: None,
            options: FilterOptions::default(),
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            dashboard: Dashboard::default(),
            type_colors: ColorMap::default(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded catalog and start from an unfiltered view.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.options = FilterOptions::from_catalog(&catalog);
        let labels: Vec<String> = self.options.types.iter().map(|t| t.to_string()).collect();
        self.type_colors = ColorMap::new(&labels);
        self.catalog = Some(catalog);
        self.selection = FilterSelection::default();
        self.status_message = None;
        self.refresh();
    }

    /// Replace the whole selection and recompute. No-op when unchanged.
    pub fn apply_selection(&mut self, selection: FilterSelection) {
        if selection == self.selection {
            return;
        }
        self.selection = selection;
        self.refresh();
    }

    pub fn reset_filters(&mut self) {
        self.apply_selection(FilterSelection::default());
    }

    /// Recompute the filtered view and every aggregate from scratch.
    pub fn refresh(&mut self) {
        match &self.catalog {
            Some(catalog) => {
                let view = if self.selection.is_default() {
                    FilteredView::all(catalog)
                } else {
                    apply(catalog, &self.selection)
                };
                self.dashboard = Dashboard::compute(&view, &self.config);
                log::debug!(
                    "{} of {} titles match {:?}",
                    view.len(),
                    catalog.len(),
                    self.selection
                );
                self.visible_indices = view.into_indices();
            }
            None => {
                self.visible_indices.clear();
                self.dashboard = Dashboard::default();
            }
        }
    }

    /// The current filtered view, if a catalog is loaded.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.catalog
            .as_ref()
            .map(|c| FilteredView::from_indices(c, &self.visible_indices))
    }

    /// Load a file chosen at runtime. On failure the current catalog stays.
    pub fn open_path(&mut self, path: &Path) {
        match load_catalog(path, &self.config) {
            Ok(catalog) => self.set_catalog(catalog),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Write the current filtered view to `path`.
    pub fn export_to(&mut self, path: &Path) {
        let delimiter = self.config.delimiter_byte();
        let result = match &self.catalog {
            Some(catalog) => export_to_path(
                &FilteredView::from_indices(catalog, &self.visible_indices),
                path,
                delimiter,
            ),
            None => {
                self.status_message = Some("Nothing to export: no dataset loaded.".to_string());
                return;
            }
        };
        self.status_message = Some(match result {
            Ok(rows) => format!("Exported {rows} titles to {}", path.display()),
            Err(e) => {
                log::error!("Failed to export: {e}");
                format!("Error: {e}")
            }
        });
    }
}
