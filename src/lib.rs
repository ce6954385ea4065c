pub mod ant;
pub mod channels;
pub mod config;
pub mod diffusion;
pub mod error;
pub mod grid;
pub mod masks;
pub mod morphology;
pub mod pheromone;
pub mod render;
pub mod reporting;
pub mod scenario;
pub mod sensing;
pub mod simulation;
pub mod stats;
pub mod world;

pub use channels::{Channels, Pheromones, FOOD, HOME};
pub use config::SimConfig;
pub use error::SimError;
pub use grid::Grid;
pub use scenario::Scenario;
pub use simulation::AntSimulation;
