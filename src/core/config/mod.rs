pub mod config;

pub use config::{
    CourseConfig, EmojiConfig, GravityConfig, PendulumConfig, SimConfig, WindowConfig,
};
