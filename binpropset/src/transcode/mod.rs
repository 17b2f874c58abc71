//! Renderings of a parsed property set in other data formats.

pub mod toml;
pub mod yaml;
