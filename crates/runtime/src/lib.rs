pub mod controller;
pub mod popup;
pub mod slider;

pub use controller::*;
pub use popup::*;
pub use slider::*;
