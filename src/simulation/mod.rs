//! The simulation tick: motion, food interaction, collision & death,
//! replenishment, plus spawn placement used by the input pipeline's
//! `hello` handler.

pub mod collision;
pub mod food_interaction;
pub mod motion;
pub mod params;
pub mod replenish;
pub mod spawn;
pub mod tick;

pub use spawn::pick_spawn_position;
pub use tick::run_tick;
