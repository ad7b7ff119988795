pub mod spinner;
pub mod styling;
