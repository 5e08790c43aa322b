//! Demo traffic generation

pub mod generator;

pub use generator::SyntheticEmailGenerator;
