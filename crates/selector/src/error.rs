use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Selector is empty")]
    Empty,

    #[error("Selector parse error in '{0}': {1}")]
    Parse(String, String),

    #[error("':scope' may only appear as the first compound, found in '{0}'")]
    MisplacedScope(String),
}
