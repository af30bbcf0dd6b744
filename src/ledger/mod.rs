//! Ledger module containing record keeping, bank accounts and the orchestrator

pub mod arithmetic;
pub mod bank;
pub mod core;
pub mod register;

pub use arithmetic::*;
pub use bank::*;
pub use core::*;
pub use register::*;
