pub mod dates;
pub mod validation;
