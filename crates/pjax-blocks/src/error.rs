use pjax_blocks_config::ConfigError;
use pjax_blocks_template::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PjaxError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid PJAX selector '{0}' found in request: must be a simple id selector of the form #<id>")]
    InvalidSelector(String),

    #[error("Request has no X-PJAX-Container header")]
    MissingContainer,

    #[error("PJAX views must return either a deferred template response or a redirect")]
    NotDeferred,

    #[error(
        "No PJAX block name: pass one to pjax_block, or send an X-PJAX-Container header or _pjax parameter"
    )]
    NoBlockName,

    #[error("pjax_block was given an empty block name")]
    EmptyBlockName,

    #[error("Tried to set the PJAX response's template to nothing. You must provide a template!")]
    EmptyTemplate,

    #[error("Template name transformation needs template names, got a compiled document")]
    TemplateNotNamed,

    #[error("Invalid URL pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    #[error("Could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}
