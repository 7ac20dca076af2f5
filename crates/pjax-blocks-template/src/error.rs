use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Template block '{0}' does not exist or was not rendered")]
    BlockNotFound(String),

    #[error("Title block '{0}' does not exist or was not rendered")]
    TitleBlockNotFound(String),

    #[error("Title variable '{0}' not found in context")]
    TitleVariableNotFound(String),

    #[error("Only one of 'title_variable' and 'title_block' may be given")]
    ConflictingTitle,

    #[error("Parent template could not be resolved: {0}")]
    ParentNotFound(String),

    #[error("Template not found, tried: {}", .0.join(", "))]
    TemplateNotFound(Vec<String>),

    #[error("Template '{0}' extends itself through its inheritance chain")]
    InheritanceCycle(String),

    #[error("{0}")]
    Leaf(String),
}
