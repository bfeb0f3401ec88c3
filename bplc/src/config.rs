use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fs::File;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scope: Scope,
}

/// Visibility of block-local declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// A local stays visible until the end of its function.
    #[default]
    Function,
    /// A local goes out of scope at the end of its block.
    Block,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
        Ok(serde_yaml::from_reader(file)?)
    }
}
