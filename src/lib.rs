//! Calmonger: labeled date ranges with distinct highlight colors.
//!
//! The interesting part is [`picker::pick_distinct_hue`], which colors a new
//! range so it stands apart from ranges already overlapping the same month.

pub mod calendar;
pub mod cli;
pub mod color;
pub mod db;
pub mod picker;
pub mod transfer;
pub mod types;

pub use picker::pick_distinct_hue;
pub use types::Range;
