//! # Njangi Core
//!
//! Bookkeeping for a Njangi: a rotating savings and credit association where
//! members save into yearly meetings, borrow against the common pot and
//! repay with flat interest.
//!
//! ## Features
//!
//! - **Register**: groups, members, meetings, memberships, contributions,
//!   loans, repayments and expenses with uniqueness checks
//! - **Bank ledgers**: signed credits/debits, balances and running balances
//! - **Member summary**: savings, outstanding debt and an advisory loan
//!   eligibility figure
//! - **Statements**: loans table, repayments table and merged history, ready
//!   for a [`StatementRenderer`]
//! - **Dashboard**: group-scoped totals and an estimated cash position
//! - **Storage abstraction**: async [`NjangiStorage`] trait with an in-memory
//!   implementation
//!
//! ## Quick Start
//!
//! ```rust
//! use njangi_core::{Member, Meeting, Njangi};
//! use njangi_core::utils::MemoryStorage;
//!
//! # async fn run() -> njangi_core::NjangiResult<()> {
//! let mut njangi = Njangi::new(MemoryStorage::new());
//! let member = njangi
//!     .create_member(Member::new("Ngozi".to_string(), "Tabe".to_string(), None))
//!     .await?;
//! let meeting = njangi
//!     .create_meeting(Meeting::new("Main".to_string(), 2024, None))
//!     .await?;
//! njangi.join_meeting(&member.id, &meeting.id, 25.into()).await?;
//!
//! let statement = njangi.member_statement(&member.id, None).await?;
//! assert_eq!(statement.member_label, "Ngozi Tabe");
//! # Ok(())
//! # }
//! ```

pub mod ledger;
pub mod report;
pub mod settings;
pub mod summary;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use report::*;
pub use settings::*;
pub use summary::*;
pub use traits::*;
pub use types::*;
