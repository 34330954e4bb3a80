pub mod catch_panic;
pub mod cors;
pub mod json_extractor;
