//! Flapping agents and their kinematics

mod bird;
mod physics;

pub use bird::Bird;
pub use physics::BirdPhysics;
