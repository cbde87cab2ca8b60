use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::panels::{self, FilterWidgets};
use crate::ui::charts;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CatalogExplorerApp {
    pub state: AppState,
    widgets: FilterWidgets,
}

impl CatalogExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            widgets: FilterWidgets::default(),
        }
    }
}

impl eframe::App for CatalogExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &mut self.widgets);
            });

        // ---- Central panel: KPIs, preview, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            match &self.state.catalog {
                None => {
                    ui.centered_and_justified(|ui: &mut Ui| {
                        ui.heading("Open a catalog to explore it  (File → Open…)");
                    });
                    return;
                }
                Some(catalog) if catalog.is_empty() => {
                    ui.centered_and_justified(|ui: &mut Ui| {
                        ui.heading("The loaded catalog has no titles.");
                    });
                    return;
                }
                Some(_) => {}
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::kpi_cards(ui, &self.state);
                    ui.separator();

                    ui.heading("Filtered Dataset Preview");
                    panels::table_preview(ui, &self.state);
                    ui.separator();

                    charts::charts(ui, &self.state);
                });
        });
    }
}
