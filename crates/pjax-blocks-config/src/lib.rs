//! Restricted decorator expressions for PJAX dispatch configuration.
//!
//! Each configured decorator is a string holding exactly one call to
//! `pjax_block` or `pjax_template`, with string-literal arguments only. The
//! string is parsed into a small expression tree, validated, and bound to a
//! typed [`DecoratorCall`]. No general evaluator is involved.
//!
//! # Example
//!
//! ```
//! use pjax_blocks_config::{parse_decorator, DecoratorCall};
//!
//! let call = parse_decorator("@pjax_block(block='content', title_block='title')").unwrap();
//! assert_eq!(
//!     call,
//!     DecoratorCall::Block {
//!         block: Some("content".to_string()),
//!         title_variable: None,
//!         title_block: Some("title".to_string()),
//!     }
//! );
//! ```

mod ast;
pub use ast::{Argument, Expr, Index};

mod parser;
pub use parser::{DecoratorParser, SyntaxError};

mod decorator;
pub use decorator::{parse_decorator, Constructor, DecoratorCall};

mod error;
pub use error::{ConfigError, ConfigErrorKind};
