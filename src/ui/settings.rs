use egui;
use tracing::warn;

use super::UiState;
use ant_colony::AntSimulation;

/// Live parameter editing. Changes are applied between ticks through
/// `AntSimulation::set_config`.
pub fn draw_settings(ctx: &egui::Context, sim: &mut AntSimulation, ui_state: &mut UiState) {
    let mut config = sim.config().clone();
    let max_sense = config.width.min(config.height).saturating_sub(1).clamp(1, 64);

    egui::Window::new("Settings")
        .default_pos(egui::pos2(20.0, 80.0))
        .default_size(egui::vec2(300.0, 380.0))
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("Pheromones");
            ui.add(egui::Slider::new(&mut config.pheromone_deposit_amount, 0.0..=10.0).text("deposit"));
            ui.add(egui::Slider::new(&mut config.nest_pheromone_deposit_amount, 0.0..=500.0).text("source level"));
            ui.add(
                egui::Slider::new(&mut config.pheromone_evaporation_rate, 0.0..=0.1)
                    .logarithmic(true)
                    .text("evaporation"),
            );
            ui.add(egui::Slider::new(&mut config.sigma_diffusion, 0.0..=2.0).text("diffusion sigma"));
            ui.add(
                egui::Slider::new(&mut config.pheromone_truncation_threshold, 0.0..=0.1)
                    .logarithmic(true)
                    .text("truncation"),
            );

            ui.separator();
            ui.heading("Ants");
            ui.add(egui::Slider::new(&mut config.sense_distance, 1..=max_sense).text("sense distance"));
            angle_slider(ui, &mut config.sense_angle, 0.0..=90.0, "sense angle");
            angle_slider(ui, &mut config.turn_angle, 0.0..=90.0, "turn angle");
            angle_slider(ui, &mut config.only_wall_turn_angle, 0.0..=180.0, "wall turn angle");
            ui.add(
                egui::Slider::new(&mut config.beta_uniformity, 0.0..=1.0)
                    .logarithmic(true)
                    .text("uniformity bias"),
            );
            ui.add(egui::Slider::new(&mut config.beta_straight, -1.0..=1.0).text("straight bias"));
            ui.checkbox(&mut config.infinite_food, "Infinite food");

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Clear pheromones").clicked() {
                    sim.clear_pheromones();
                }
                if ui.button("Restart colony").clicked() {
                    ui_state.restart_requested = true;
                }
            });
            ui.label(format!("Grid: {}x{}  seed {}", config.width, config.height, config.seed));
        });

    if &config != sim.config() {
        if let Err(err) = sim.set_config(config) {
            warn!(%err, "rejected settings change");
        }
    }
}

fn angle_slider(ui: &mut egui::Ui, radians: &mut f32, degrees: std::ops::RangeInclusive<f32>, label: &str) {
    let mut value = radians.to_degrees();
    if ui
        .add(egui::Slider::new(&mut value, degrees).suffix("°").text(label))
        .changed()
    {
        *radians = value.to_radians();
    }
}
