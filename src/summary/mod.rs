//! Member financial summary: savings, outstanding debt and an advisory
//! loan eligibility figure

pub mod member;
pub mod snapshot;

pub use member::*;
pub use snapshot::*;
