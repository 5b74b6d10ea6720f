//! # Stowage core
//!
//! Container grid resizing. [`size_policy`] turns configured rules into a
//! target extent, [`inventory::ensure_fits`] widens it around saved contents,
//! and [`inventory::reconcile`] re-fits the entries, merging what stacks and
//! handing the rest to an [`inventory::EjectSink`].

pub mod config;
pub mod inventory;
pub mod saved_state;
pub mod size_policy;
