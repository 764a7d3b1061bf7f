//! Output formatting for the declared network.
//!
//! - [`csv`] - CSV subnet allocation report
//! - [`terminal`] - Terminal output with colors

mod csv;
mod terminal;

pub use csv::{subnet_print, subnet_rows, write_subnets, SubnetRow};
pub use terminal::{format_field, purpose_label, verdict};
