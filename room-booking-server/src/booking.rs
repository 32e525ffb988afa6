pub mod status;
pub mod validation;
