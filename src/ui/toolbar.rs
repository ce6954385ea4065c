use egui;

use super::UiState;
use ant_colony::AntSimulation;

const SPEEDS: [u32; 5] = [1, 5, 20, 50, 200];

/// Status strip with run controls and colony counters.
pub fn draw_toolbar(ctx: &egui::Context, sim: &AntSimulation, ui_state: &mut UiState) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.add_space(3.0);
        ui.horizontal_wrapped(|ui| {
            title_badge(ui, "ANTS");

            ui.separator();
            compact_group(ui, "Sim", |ui| {
                let pause_label = if ui_state.paused { "Play" } else { "Pause" };
                if ui.button(pause_label).clicked() {
                    ui_state.paused = !ui_state.paused;
                }
                if ui.button("Step").clicked() {
                    ui_state.paused = true;
                    ui_state.step_requested = true;
                }
                if ui.button("Restart").clicked() {
                    ui_state.restart_requested = true;
                }
            });

            compact_group(ui, "Steps/frame", |ui| {
                for speed in SPEEDS {
                    speed_button(ui, ui_state, speed);
                }
            });

            compact_group(ui, "Panels", |ui| {
                ui.toggle_value(&mut ui_state.show_graphs, "Graphs");
                ui.toggle_value(&mut ui_state.show_settings, "Settings");
            });
        });

        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            metric_chip(ui, "Tick", format!("{}", sim.tick_count()));
            metric_chip(ui, "Ants", format!("{}", sim.ants().len()));
            metric_chip(ui, "Carrying", format!("{}", sim.carrying_count()));
            metric_chip(ui, "Collected", format!("{}", sim.food_collected()));
            metric_chip(ui, "At nest", format!("{}", sim.food_at_nest()));
            if !sim.config().infinite_food {
                metric_chip(ui, "Food left", format!("{}", sim.masks().food_cell_count()));
            }
            metric_chip(ui, "FPS", format!("{}", macroquad::time::get_fps()));
            if ui_state.paused {
                status_chip(ui, "PAUSED", egui::Color32::from_rgb(230, 190, 90));
            }
        });
        ui.add_space(3.0);
    });
}

fn speed_button(ui: &mut egui::Ui, ui_state: &mut UiState, speed: u32) {
    let selected = ui_state.steps_per_frame == speed;
    if ui.selectable_label(selected, format!("{speed}")).clicked() {
        ui_state.steps_per_frame = speed;
    }
}

fn title_badge(ui: &mut egui::Ui, label: &str) {
    let text = egui::RichText::new(label)
        .strong()
        .color(egui::Color32::from_rgb(190, 220, 255));
    ui.label(text);
}

fn compact_group(ui: &mut egui::Ui, heading: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(heading)
                    .small()
                    .color(egui::Color32::from_rgb(150, 170, 185)),
            );
            add_contents(ui);
        });
    });
}

fn metric_chip(ui: &mut egui::Ui, key: &str, value: String) {
    let text = egui::RichText::new(format!("{key}: {value}"))
        .small()
        .color(egui::Color32::from_rgb(205, 215, 225));
    ui.group(|ui| {
        ui.label(text);
    });
}

fn status_chip(ui: &mut egui::Ui, label: &str, color: egui::Color32) {
    ui.group(|ui| {
        ui.label(egui::RichText::new(label).small().strong().color(color));
    });
}
