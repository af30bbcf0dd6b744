//! Reporting: member statements, group roster, dashboard totals and renderers

pub mod dashboard;
pub mod render;
pub mod roster;
pub mod statement;

pub use dashboard::*;
pub use render::*;
pub use roster::*;
pub use statement::*;
