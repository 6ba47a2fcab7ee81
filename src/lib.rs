pub mod config;
pub mod geometry;
pub mod machine;
pub mod runner;
pub mod state;
pub mod surface;
pub mod term_surface;

pub use config::Config;
pub use geometry::{Coord, Direction};
pub use machine::{Game, Layout, Status};
pub use runner::run;
pub use state::{Bounds, FoodSpawner, GameState};
pub use surface::{Border, Key, Region, Surface};
pub use term_surface::TermSurface;
