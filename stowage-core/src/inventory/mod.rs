//! This module contains the container contents model and the resize pipeline.

mod container;
mod eject;
mod entry;
mod fit;
mod reconcile;
mod simple_container;

pub use container::Container;
pub use eject::{EjectError, EjectReport, EjectSink, eject_all};
pub use entry::{Entry, StackKey, same_stack};
pub use fit::ensure_fits;
pub use reconcile::{GridReconciler, ReconcileStats, Reconciled, reconcile};
pub use simple_container::SimpleContainer;
