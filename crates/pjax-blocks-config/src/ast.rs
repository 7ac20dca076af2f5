//! Expression tree produced by [`crate::DecoratorParser`].
//!
//! The parser accepts more than the decorator grammar allows so that each
//! kind of mistake can be reported precisely; validation happens afterwards.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Bare identifier: `pjax_block`, `True`.
    Name(String),
    /// String literal, adjacent literals already joined.
    Str(String),
    /// Numeric literal, kept as written.
    Number(String),
    /// Unary minus.
    Neg(Box<Expr>),
    List(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Call { func: Box<Expr>, args: Vec<Argument> },
    Attribute { value: Box<Expr>, attr: String },
    Subscript { value: Box<Expr>, index: Box<Index> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    Item(Expr),
    Slice { lower: Option<Expr>, upper: Option<Expr> },
}

/// One argument of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Positional(Expr),
    Keyword(String, Expr),
    /// `*expr`
    Star(Expr),
    /// `**expr`
    DoubleStar(Expr),
}

impl Argument {
    /// The argument's value expression.
    pub fn value(&self) -> &Expr {
        match self {
            Argument::Positional(e) | Argument::Keyword(_, e) | Argument::Star(e) | Argument::DoubleStar(e) => e,
        }
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, Argument::Star(_) | Argument::DoubleStar(_))
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Name(name) => f.write_str(name),
            Expr::Str(s) => write!(f, "{s:?}"),
            Expr::Number(n) => f.write_str(n),
            Expr::Neg(e) => write!(f, "-{e}"),
            Expr::List(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Expr::Dict(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Expr::Call { func, args } => {
                write!(f, "{func}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Attribute { value, attr } => write!(f, "{value}.{attr}"),
            Expr::Subscript { value, index } => write!(f, "{value}[{index}]"),
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Item(e) => write!(f, "{e}"),
            Index::Slice { lower, upper } => {
                if let Some(lower) = lower {
                    write!(f, "{lower}")?;
                }
                f.write_str(":")?;
                if let Some(upper) = upper {
                    write!(f, "{upper}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Positional(e) => write!(f, "{e}"),
            Argument::Keyword(name, e) => write!(f, "{name}={e}"),
            Argument::Star(e) => write!(f, "*{e}"),
            Argument::DoubleStar(e) => write!(f, "**{e}"),
        }
    }
}
