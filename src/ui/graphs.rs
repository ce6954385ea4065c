use egui;

use ant_colony::stats::{ColonyStats, RingBuffer};

const PICKUP_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 110, 90);
const DELIVERY_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 200, 100);

/// Draw rolling food-flow graphs.
pub fn draw_graphs(ctx: &egui::Context, stats: &ColonyStats) {
    egui::Window::new("Statistics")
        .default_pos(egui::pos2(20.0, 480.0))
        .default_size(egui::vec2(360.0, 240.0))
        .resizable(true)
        .show(ctx, |ui| {
            ui.label(format!("one sample every {} ticks", stats.sample_interval));

            ui.collapsing("Pickups / Deliveries", |ui| {
                let size = egui::vec2(ui.available_width(), 80.0);
                let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
                let rect = response.rect;

                painter.rect_filled(rect, 2.0, egui::Color32::from_gray(20));
                draw_line_in_rect(&painter, &stats.pickups, rect, PICKUP_COLOR);
                draw_line_in_rect(&painter, &stats.deliveries, rect, DELIVERY_COLOR);

                ui.horizontal(|ui| {
                    ui.colored_label(PICKUP_COLOR, "Pickups");
                    ui.colored_label(DELIVERY_COLOR, "Deliveries");
                });
            });

            ui.collapsing("Carrying fraction", |ui| {
                draw_line_graph(ui, &stats.carrying_fraction, egui::Color32::from_rgb(255, 200, 0));
            });
        });
}

fn draw_line_graph(ui: &mut egui::Ui, buffer: &RingBuffer, color: egui::Color32) {
    let size = egui::vec2(ui.available_width(), 80.0);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect;

    painter.rect_filled(rect, 2.0, egui::Color32::from_gray(20));

    draw_line_in_rect(&painter, buffer, rect, color);

    if let Some(val) = buffer.last() {
        painter.text(
            egui::pos2(rect.right() - 4.0, rect.top() + 2.0),
            egui::Align2::RIGHT_TOP,
            format!("{val:.2}"),
            egui::FontId::proportional(10.0),
            egui::Color32::from_gray(200),
        );
    }
}

/// Plot `buffer` scaled to `rect`, with the baseline at zero.
fn draw_line_in_rect(painter: &egui::Painter, buffer: &RingBuffer, rect: egui::Rect, color: egui::Color32) {
    let len = buffer.len();
    if len < 2 {
        return;
    }

    let samples: Vec<f32> = buffer.iter().collect();
    let max_val = samples.iter().cloned().fold(f32::EPSILON, f32::max);

    let points: Vec<egui::Pos2> = samples
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = rect.left() + (i as f32 / (len - 1) as f32) * rect.width();
            let y = rect.bottom() - (v / max_val) * rect.height();
            egui::pos2(x, y)
        })
        .collect();

    for pair in points.windows(2) {
        painter.line_segment([pair[0], pair[1]], egui::Stroke::new(1.5, color));
    }
}
