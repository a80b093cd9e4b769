//! Core business logic - framework-agnostic ledger and directory operations.
//!
//! The ledger modules ([`points`], [`sales`], [`inventory`], [`validation`])
//! own every write to the two shared counters: `teams.total_points` and
//! `product_inventory.quantity`. The directory modules ([`team`], [`user`],
//! [`product`]) provide lookups and record creation.

pub(crate) mod display;
/// Per-size stock counters
pub mod inventory;
/// Manual points awards
pub mod points;
/// Product catalog
pub mod product;
/// Product sales
pub mod sales;
/// Catalog seeding from configuration
pub mod seed;
/// Teams, standings and the team points counter
pub mod team;
/// Users and caller authorization
pub mod user;
/// Read-only checks run before ledger transactions
pub mod validation;
