//! Token models and the expiry predicates that drive refresh decisions.

pub mod expiry;
pub mod token;

pub use expiry::*;
pub use token::{record::*, secret::*};
