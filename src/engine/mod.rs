// Engine modules: physics, frame timing, render read model

pub mod game_loop;
pub mod physics;
pub mod renderer;
