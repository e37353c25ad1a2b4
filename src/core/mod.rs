// Core modules implementing value conversion, extraction, model contracts, and errors.
pub mod date;
pub mod error;
pub mod extract;
pub mod model;
pub mod value;
