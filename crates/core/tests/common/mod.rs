/// Driver run helpers.
pub mod harness;
