pub mod graphs;
pub mod settings;
pub mod toolbar;

use ant_colony::stats::ColonyStats;
use ant_colony::AntSimulation;

/// Viewer run state and which panels are open.
pub struct UiState {
    pub paused: bool,
    pub step_requested: bool,
    pub restart_requested: bool,
    pub steps_per_frame: u32,
    pub show_graphs: bool,
    pub show_settings: bool,
}

impl UiState {
    pub fn new(steps_per_frame: u32) -> Self {
        Self {
            paused: false,
            step_requested: false,
            restart_requested: false,
            steps_per_frame,
            show_graphs: true,
            show_settings: false,
        }
    }

    /// Number of ticks to run this frame; consumes a pending single step.
    pub fn ticks_this_frame(&mut self) -> u32 {
        if !self.paused {
            return self.steps_per_frame;
        }
        if std::mem::take(&mut self.step_requested) {
            1
        } else {
            0
        }
    }
}

/// Draw all egui UI panels.
pub fn draw_ui(sim: &mut AntSimulation, ui_state: &mut UiState, stats: &ColonyStats) {
    egui_macroquad::ui(|ctx| {
        toolbar::draw_toolbar(ctx, sim, ui_state);

        if ui_state.show_graphs {
            graphs::draw_graphs(ctx, stats);
        }

        if ui_state.show_settings {
            settings::draw_settings(ctx, sim, ui_state);
        }
    });

    egui_macroquad::draw();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_state_runs_only_requested_steps() {
        let mut state = UiState::new(7);
        assert_eq!(state.ticks_this_frame(), 7);

        state.paused = true;
        assert_eq!(state.ticks_this_frame(), 0);
        state.step_requested = true;
        assert_eq!(state.ticks_this_frame(), 1);
        assert_eq!(state.ticks_this_frame(), 0);
    }
}
