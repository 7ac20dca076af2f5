use thiserror::Error;

/// Why a decorator expression was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigErrorKind {
    #[error("expression should start with '@'")]
    MissingMarker,

    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("decorator expression must be a single call to pjax_block or pjax_template")]
    NotACall,

    #[error("'{0}' is not pjax_block or pjax_template")]
    UnknownConstructor(String),

    #[error("unpacking * and ** arguments is not supported")]
    VariadicArgument,

    #[error("only string arguments are allowed")]
    NonStringArgument,

    #[error("{constructor} takes at most {max} positional arguments")]
    TooManyArguments { constructor: &'static str, max: usize },

    #[error("{constructor} got an unexpected keyword argument '{keyword}'")]
    UnknownKeyword { constructor: &'static str, keyword: String },

    #[error("{constructor} got multiple values for argument '{argument}'")]
    DuplicateArgument { constructor: &'static str, argument: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("\"{expression}\" does not define a valid PJAX decorator: {kind}")]
pub struct ConfigError {
    pub expression: String,
    pub kind: ConfigErrorKind,
}

impl ConfigError {
    pub fn new(expression: &str, kind: ConfigErrorKind) -> Self {
        Self { expression: expression.to_string(), kind }
    }
}
