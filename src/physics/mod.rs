pub mod pendulum;
pub mod rapier_setup;
