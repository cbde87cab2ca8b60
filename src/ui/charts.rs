use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::intensity;
use crate::data::aggregate::{Frequency, YearCount};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

fn no_data(ui: &mut Ui, msg: &str) {
    ui.label(RichText::new(msg).italics().weak());
}

/// Bars at x = 0, 1, 2, … labelled with the category names.
fn category_chart(
    ui: &mut Ui,
    id: &str,
    items: &[Frequency],
    color_for: impl Fn(&Frequency) -> Color32,
) {
    let labels: Vec<String> = items.iter().map(|f| f.label.clone()).collect();
    let bars: Vec<Bar> = items
        .iter()
        .enumerate()
        .map(|(i, f)| {
            Bar::new(i as f64, f.count as f64)
                .name(&f.label)
                .fill(color_for(f))
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .y_axis_label("Count")
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(id));
        });
}

fn top_n_chart(ui: &mut Ui, id: &str, items: &[Frequency]) {
    let max = items.first().map_or(0, |f| f.count);
    category_chart(ui, id, items, |f| intensity(f.count, max));
}

fn year_chart(ui: &mut Ui, years: &[YearCount]) {
    let max = years.iter().map(|y| y.count).max().unwrap_or(0);
    let bars: Vec<Bar> = years
        .iter()
        .map(|y| {
            Bar::new(y.year as f64, y.count as f64)
                .name(y.year)
                .fill(intensity(y.count, max))
                .width(0.8)
        })
        .collect();

    Plot::new("releases_by_year")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_label("Year")
        .y_axis_label("Number of titles")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Releases"));
        });
}

// ---------------------------------------------------------------------------
// Chart sections (central panel)
// ---------------------------------------------------------------------------

/// Render every chart for the current dashboard.
pub fn charts(ui: &mut Ui, state: &AppState) {
    let dash = &state.dashboard;

    ui.heading("Content Type Distribution");
    if dash.types.is_empty() {
        no_data(ui, "No data for content-type chart with current filters.");
    } else {
        category_chart(ui, "content_types", &dash.types, |f| {
            state.type_colors.color_for(&f.label)
        });
    }
    ui.separator();

    ui.heading(format!("Releases Over the Years ({} onwards)", state.config.year_floor));
    if dash.years.is_empty() {
        no_data(
            ui,
            &format!(
                "No release-year data in the {}+ range for current filters.",
                state.config.year_floor
            ),
        );
    } else {
        year_chart(ui, &dash.years);
    }
    ui.separator();

    ui.heading(format!("Top {} Genres", state.config.top_genres));
    if dash.top_genres.is_empty() {
        no_data(ui, "No genre data available for the selected filters.");
    } else {
        top_n_chart(ui, "top_genres", &dash.top_genres);
    }
    ui.separator();

    ui.heading(format!("Top {} Directors", state.config.top_directors));
    if dash.top_directors.is_empty() {
        no_data(ui, "No director data available for selected filters.");
    } else {
        top_n_chart(ui, "top_directors", &dash.top_directors);
    }
    ui.separator();

    ui.heading(format!("Top {} Actors", state.config.top_actors));
    if dash.top_actors.is_empty() {
        no_data(ui, "No actor data available for selected filters.");
    } else {
        top_n_chart(ui, "top_actors", &dash.top_actors);
    }
}
