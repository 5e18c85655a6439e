use crate::data_structures::block::BlockId;

#[derive(Debug, thiserror::Error)]
pub enum StackError {
    #[error("no block source set, assign a factory template or a fallback template")]
    MissingTemplate,
    #[error("{0} is not part of the scene")]
    MissingBlock(BlockId),
    #[error("{0} has no rigid body")]
    MissingRigidBody(BlockId),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
