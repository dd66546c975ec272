pub mod error;
pub mod math;
pub mod maps;
pub mod sequence;
pub mod grid;
pub mod fractal;
pub mod graph;
pub mod wave;
pub mod render;
pub mod config;
pub mod batch;

pub use error::{Error, Result};
pub use math::{C, linspace};
pub use maps::{IteratedMap, LogisticMap};
pub use sequence::{Sequence, generate_sequence, final_state, long_term_sweep, map_curve};
pub use grid::{Grid, Field, Matrix};
pub use fractal::{
    Recurrence, Quadratic, Julia, Region, View,
    escape_time, escape_field, escape_field_sequential, generate_field
};
pub use graph::{Graph, Layout};
pub use wave::wave_matrix;
pub use config::RenderConfig;
