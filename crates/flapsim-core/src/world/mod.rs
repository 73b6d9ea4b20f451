//! Scrolling world: pipe pairs, their spawner and the looping ground strip

mod ground;
mod pipe;
mod rng_trait;
mod spawner;

pub use ground::Ground;
pub use pipe::Pipe;
pub use rng_trait::SpawnRng;
pub use spawner::PipeSpawner;
