use crate::dom::DomError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unknown diagram option `{0}`")]
    UnknownOption(String),
    #[error("invalid selector `{0}` (expected `tag`, `.class` or `tag.class`)")]
    InvalidSelector(String),
    #[error("invalid option toggle `{0}` (expected `INDEX:OPTION=true|false`)")]
    InvalidToggle(String),
    #[error("no diagram instance with index {0}")]
    NoSuchInstance(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
