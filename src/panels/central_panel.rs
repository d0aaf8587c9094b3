use eframe::egui;

use crate::TraceApp;

pub fn central_panel(app: &mut TraceApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("⬅ Previous").clicked() {
                app.previous_guide();
            }
            ui.heading(app.current_character().to_string());
            if ui.button("Next ➡").clicked() {
                app.next_guide();
            }
        });
        ui.separator();

        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
        let rect = response.rect;

        app.layout_canvas(rect, ctx.pixels_per_point());
        app.handle_canvas_input(ctx, rect);
        app.paint_canvas(ctx, &painter, rect);
    });
}
