pub mod app;
pub mod input;
pub mod palette;
pub mod render;
pub mod screen;

pub use app::run;
