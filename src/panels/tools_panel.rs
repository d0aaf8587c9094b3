use eframe::egui;

use crate::color::{parse_hex_color, to_color32, PALETTE};
use crate::panels::TraceMode;
use crate::tool::{ToolKind, MAX_BRUSH_WIDTH};
use crate::TraceApp;

const SWATCH_SIZE: f32 = 24.0;

pub fn tools_panel(app: &mut TraceApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");
            ui.horizontal_wrapped(|ui| {
                for tool in ToolKind::ALL {
                    let selected = app.settings().tool == tool;
                    if ui.selectable_label(selected, tool.label()).clicked() {
                        app.select_tool(tool);
                    }
                }
            });

            ui.separator();
            ui.label("Color:");
            ui.horizontal_wrapped(|ui| {
                for hex in PALETTE {
                    let swatch = egui::Button::new("")
                        .fill(to_color32(parse_hex_color(hex)))
                        .min_size(egui::vec2(SWATCH_SIZE, SWATCH_SIZE))
                        .selected(app.settings().color.eq_ignore_ascii_case(hex));
                    if ui.add(swatch).on_hover_text(hex).clicked() {
                        app.select_color(hex);
                    }
                }
            });
            ui.horizontal(|ui| {
                let preview = to_color32(app.settings().rgba());
                let (swatch, _) = ui.allocate_exact_size(
                    egui::vec2(SWATCH_SIZE, SWATCH_SIZE),
                    egui::Sense::hover(),
                );
                ui.painter().rect_filled(swatch, 4.0, preview);
                ui.add(egui::TextEdit::singleline(app.color_mut()).desired_width(80.0));
            });

            ui.horizontal(|ui| {
                ui.label("Brush:");
                ui.add(egui::Slider::new(app.brush_width_mut(), 1..=MAX_BRUSH_WIDTH).suffix(" px"));
            });

            ui.separator();
            ui.horizontal(|ui| {
                let can_undo = app.surface().can_undo();
                if ui.add_enabled(can_undo, egui::Button::new("↶ Undo")).clicked() {
                    app.undo();
                }
                if ui.button("🗑 Clear").clicked() {
                    app.clear();
                }
                if ui.button("💾 Save").clicked() {
                    app.save_drawing();
                }
            });
            ui.label(format!("History: {} snapshots", app.surface().history_depth()));

            ui.separator();
            ui.label("Line art image:");
            ui.add(
                egui::TextEdit::singleline(app.background_input_mut())
                    .hint_text("path, URL or data: URL"),
            );
            ui.horizontal(|ui| {
                if ui.button("Load").clicked() {
                    app.load_background();
                }
                if app.surface().is_loading_background() {
                    ui.spinner();
                }
            });

            ui.separator();
            ui.label("Trace:");
            ui.horizontal(|ui| {
                for mode in TraceMode::ALL {
                    if ui.selectable_label(app.mode() == mode, mode.label()).clicked() {
                        app.set_mode(mode);
                    }
                }
            });
            ui.checkbox(app.show_guide_mut(), "Show guide letter");

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
}
