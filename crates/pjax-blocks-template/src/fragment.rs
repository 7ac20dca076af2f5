use crate::error::TemplateError;

/// Where the `<title>` of a fragment comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TitleSource {
    #[default]
    None,
    /// A context variable.
    Variable(String),
    /// The captured output of another block.
    Block(String),
}

/// What to render for a fragment request: a block and a title source.
///
/// A spec without a block renders the whole template, which is what
/// fragment-specific templates want.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSpec {
    block: Option<String>,
    title: TitleSource,
}

impl DecorationSpec {
    /// Builds a spec, rejecting a title variable and a title block given
    /// together. Empty strings count as absent.
    pub fn new(
        block: Option<String>,
        title_variable: Option<String>,
        title_block: Option<String>,
    ) -> Result<Self, TemplateError> {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        let title = match (non_empty(title_variable), non_empty(title_block)) {
            (Some(_), Some(_)) => return Err(TemplateError::ConflictingTitle),
            (Some(var), None) => TitleSource::Variable(var),
            (None, Some(block)) => TitleSource::Block(block),
            (None, None) => TitleSource::None,
        };
        Ok(Self { block: non_empty(block), title })
    }

    /// The block to capture.
    pub fn block(&self) -> Option<&str> {
        self.block.as_deref()
    }

    pub fn title(&self) -> &TitleSource {
        &self.title
    }

    pub fn with_block(mut self, block: Option<String>) -> Self {
        self.block = block.filter(|s| !s.is_empty());
        self
    }
}
