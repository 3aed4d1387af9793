pub mod kma;
pub mod slot;
pub mod weather;
