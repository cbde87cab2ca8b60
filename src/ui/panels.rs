use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export::cell_value;
use crate::state::AppState;

/// Widget-local text that is not part of the filter selection.
#[derive(Debug, Default)]
pub struct FilterWidgets {
    country_search: String,
    genre_search: String,
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
///
/// Widgets edit a copy of the selection; the copy replaces the state's
/// selection in one step at the end of the frame.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, widgets: &mut FilterWidgets) {
    ui.heading("Filters & Search");
    ui.separator();

    if state.catalog.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut draft = state.selection.clone();
    let mut reset = false;
    let options = &state.options;
    ui.weak(format!(
        "Release years in catalog: {}–{}",
        options.years.start(),
        options.years.end()
    ));

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if options.has_types() {
                ui.strong("Type (Movie / TV Show)");
                let current = draft
                    .kind
                    .as_ref()
                    .map_or_else(|| "All".to_string(), |k| k.to_string());
                egui::ComboBox::from_id_salt("type_filter")
                    .selected_text(current)
                    .show_ui(ui, |ui: &mut Ui| {
                        ui.selectable_value(&mut draft.kind, None, "All");
                        for kind in &options.types {
                            ui.selectable_value(&mut draft.kind, Some(kind.clone()), kind.to_string());
                        }
                    });
                ui.separator();
            }

            multi_select(
                ui,
                "Country",
                &options.countries,
                &mut draft.countries,
                &mut widgets.country_search,
            );
            multi_select(
                ui,
                "Genre",
                &options.genres,
                &mut draft.genres,
                &mut widgets.genre_search,
            );
            ui.separator();

            ui.strong("Search Title");
            ui.add(egui::TextEdit::singleline(&mut draft.title_query).hint_text("title contains…"));
            ui.strong("Search Actor");
            ui.add(egui::TextEdit::singleline(&mut draft.actor_query).hint_text("cast contains…"));
            ui.separator();

            if ui
                .add_enabled(!draft.is_default(), egui::Button::new("Reset Filters"))
                .clicked()
            {
                reset = true;
            }
        });

    if reset {
        *widgets = FilterWidgets::default();
        state.reset_filters();
    } else {
        state.apply_selection(draft);
    }
}

/// Collapsible checklist with a search box. Nothing checked = no filter.
fn multi_select(
    ui: &mut Ui,
    label: &str,
    all_values: &[String],
    selected: &mut BTreeSet<String>,
    search: &mut String,
) {
    let header_text = format!("{label}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(label)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.add(
                    egui::TextEdit::singleline(search)
                        .hint_text("search…")
                        .desired_width(120.0),
                );
                if ui.small_button("Clear").clicked() {
                    selected.clear();
                }
            });

            let needle = search.to_lowercase();
            ScrollArea::vertical()
                .id_salt(label)
                .max_height(180.0)
                .show(ui, |ui: &mut Ui| {
                    for val in all_values
                        .iter()
                        .filter(|v| needle.is_empty() || v.to_lowercase().contains(&needle))
                    {
                        let mut checked = selected.contains(val);
                        if ui.checkbox(&mut checked, val.as_str()).changed() {
                            if checked {
                                selected.insert(val.clone());
                            } else {
                                selected.remove(val);
                            }
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.catalog.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(view) = state.view() {
            ui.label(format!(
                "{} titles loaded, {} visible",
                view.catalog().len(),
                view.len()
            ));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            let text = RichText::new(msg);
            if msg.starts_with("Error") {
                ui.label(text.color(Color32::RED));
            } else {
                ui.label(text);
            }
        }
    });
}

// ---------------------------------------------------------------------------
// KPI cards and table preview
// ---------------------------------------------------------------------------

/// Five headline counts for the current selection.
pub fn kpi_cards(ui: &mut Ui, state: &AppState) {
    let s = &state.dashboard.summary;
    let cards = [
        ("Total Titles", s.total, "Titles matching current filters"),
        ("Movies", s.movies, "Total movies in selection"),
        ("TV Shows", s.tv_shows, "Total TV shows in selection"),
        ("Countries", s.distinct_countries, "Distinct origin countries"),
        ("Unique Genres", s.distinct_genres, "Genre types in selection"),
    ];

    ui.columns(cards.len(), |cols| {
        for (col, (label, value, sub)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(RichText::new(label).strong());
                    ui.label(RichText::new(value.to_string()).size(24.0).strong());
                    ui.small(sub);
                });
            });
        }
    });
}

/// The filtered rows, capped at `preview_rows`.
pub fn table_preview(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.view() else {
        return;
    };
    if view.is_empty() {
        ui.label(RichText::new("No titles match the current filters.").italics());
        return;
    }

    let catalog = view.catalog();
    let columns = &catalog.columns;
    let shown = view.len().min(state.config.preview_rows);

    ui.push_id("preview_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(360.0)
            .columns(Column::initial(140.0).at_least(40.0).clip(true), columns.len())
            .header(20.0, |mut header| {
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(catalog.column_name(*col));
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, shown, |mut row| {
                    let Some(rec) = view.get(row.index()) else {
                        return;
                    };
                    for col in columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell_value(rec, *col).as_ref());
                        });
                    }
                });
            });
    });

    ui.label(format!("Records displayed: {}", view.len()));
    if shown < view.len() {
        ui.weak(format!(
            "Preview limited to the first {shown} rows; export includes all of them."
        ));
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open catalog")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered titles")
        .set_file_name(state.config.export_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
