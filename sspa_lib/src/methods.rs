//! Pathway analysis methods
pub mod ora;
pub mod ssgsea;
