pub mod admission;
pub mod quiz;
