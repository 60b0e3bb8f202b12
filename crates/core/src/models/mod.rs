pub mod asset;
pub mod command;
pub mod dataset;
pub mod favorites;
pub mod filter;
pub mod preferences;
pub mod row;
pub mod settings;
pub mod sort;
