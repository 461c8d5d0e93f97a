//! Common types shared by the parser, the layout engine and the public API.

pub mod error;
pub mod options;
pub mod style;
pub mod unit;

pub use error::{Error, Result};
pub use options::LayoutOptions;
pub use style::{Color, Point, Rect};
pub use unit::TwipsRounding;
