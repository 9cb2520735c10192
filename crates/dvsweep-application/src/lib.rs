pub mod reconciler;

pub use reconciler::{ItemAction, ItemReport, ReconcileReport, Reconciler};
