pub mod resolver;
pub mod style;

pub use resolver::{StyleMap, StyleResolver};
pub use style::{Align, NumberLineSkip, Style};
