//! Validation and interpretation of decorator expressions.
//!
//! The only thing this interpreter knows how to do is bind string literals
//! to the parameters of one of two constructors. Nothing else is evaluated.

use crate::ast::{Argument, Expr};
use crate::error::{ConfigError, ConfigErrorKind};
use crate::parser::DecoratorParser;

/// The two recognised decorator constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constructor {
    PjaxBlock,
    PjaxTemplate,
}

impl Constructor {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pjax_block" => Some(Constructor::PjaxBlock),
            "pjax_template" => Some(Constructor::PjaxTemplate),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Constructor::PjaxBlock => "pjax_block",
            Constructor::PjaxTemplate => "pjax_template",
        }
    }

    /// Parameter names in positional order.
    pub fn params(self) -> &'static [&'static str] {
        match self {
            Constructor::PjaxBlock => &["block", "title_variable", "title_block"],
            Constructor::PjaxTemplate => &["template"],
        }
    }
}

/// A validated decorator call with its string arguments bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoratorCall {
    /// `@pjax_block(block, title_variable, title_block)`
    Block {
        block: Option<String>,
        title_variable: Option<String>,
        title_block: Option<String>,
    },
    /// `@pjax_template(template)`
    Template { template: Option<String> },
}

impl DecoratorCall {
    pub fn constructor(&self) -> Constructor {
        match self {
            DecoratorCall::Block { .. } => Constructor::PjaxBlock,
            DecoratorCall::Template { .. } => Constructor::PjaxTemplate,
        }
    }
}

/// Parses a decorator string such as
/// `@pjax_block(block='content', title_variable='page_title')`.
///
/// Checks run in a fixed order and the first failure is reported: the `@`
/// marker, a single call, a known constructor, no `*`/`**` unpacking, string
/// literals only, then argument binding.
pub fn parse_decorator(source: &str) -> Result<DecoratorCall, ConfigError> {
    let error = |kind| ConfigError::new(source, kind);

    let body = source.strip_prefix('@').ok_or_else(|| error(ConfigErrorKind::MissingMarker))?;

    let expr = DecoratorParser::parse(body).map_err(|e| {
        error(ConfigErrorKind::Syntax { offset: e.offset + 1, message: e.message })
    })?;

    let Expr::Call { func, args } = expr else {
        return Err(error(ConfigErrorKind::NotACall));
    };

    let constructor = match func.as_ref() {
        Expr::Name(name) => Constructor::from_name(name),
        _ => None,
    }
    .ok_or_else(|| error(ConfigErrorKind::UnknownConstructor(func.to_string())))?;

    if args.iter().any(Argument::is_variadic) {
        return Err(error(ConfigErrorKind::VariadicArgument));
    }

    if !args.iter().all(|arg| matches!(arg.value(), Expr::Str(_))) {
        return Err(error(ConfigErrorKind::NonStringArgument));
    }

    let values = bind(constructor, args).map_err(error)?;
    tracing::trace!(decorator = source, constructor = constructor.name(), "parsed decorator");

    let mut values = values.into_iter();
    let mut next = || values.next().flatten();
    Ok(match constructor {
        Constructor::PjaxBlock => DecoratorCall::Block {
            block: next(),
            title_variable: next(),
            title_block: next(),
        },
        Constructor::PjaxTemplate => DecoratorCall::Template { template: next() },
    })
}

/// Binds string arguments to parameter slots, positionally then by keyword.
fn bind(constructor: Constructor, args: Vec<Argument>) -> Result<Vec<Option<String>>, ConfigErrorKind> {
    let params = constructor.params();
    let mut slots: Vec<Option<String>> = vec![None; params.len()];
    let mut position = 0;
    for arg in args {
        let (index, value) = match arg {
            Argument::Positional(Expr::Str(value)) => {
                if position >= params.len() {
                    return Err(ConfigErrorKind::TooManyArguments {
                        constructor: constructor.name(),
                        max: params.len(),
                    });
                }
                position += 1;
                (position - 1, value)
            }
            Argument::Keyword(keyword, Expr::Str(value)) => {
                let index = params.iter().position(|p| *p == keyword).ok_or_else(|| {
                    ConfigErrorKind::UnknownKeyword { constructor: constructor.name(), keyword: keyword.clone() }
                })?;
                (index, value)
            }
            _ => return Err(ConfigErrorKind::NonStringArgument),
        };
        if slots[index].is_some() {
            return Err(ConfigErrorKind::DuplicateArgument {
                constructor: constructor.name(),
                argument: params[index].to_string(),
            });
        }
        slots[index] = Some(value);
    }
    Ok(slots)
}
