// Utility functions
// Money conversion, request metadata

pub mod money;
pub mod request_info;

pub use money::{from_minor_units, to_minor_units, unsigned_to_major_units};
pub use request_info::{extract_signature, extract_source_ip};
