//! Small reusable rendering helpers.

pub mod legend;
pub mod toggles;
