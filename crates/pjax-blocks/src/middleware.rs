//! Applies configured decorations to template responses by URL.

use crate::config::PjaxConfig;
use crate::decorator::Decoration;
use crate::error::PjaxError;
use crate::request::Request;
use crate::response::Response;
use crate::utils::strip_pjax_parameter;
use regex::Regex;

/// A URL pattern and the decorations for matching paths, innermost first.
#[derive(Debug, Clone)]
pub struct RouteRule {
    source: String,
    pattern: Regex,
    decorations: Vec<Decoration>,
}

impl RouteRule {
    /// Compiles `pattern`, anchored at the start of the path. Decorations
    /// are given outermost first, as they would be written above a view.
    pub fn new(pattern: &str, decorations: Vec<Decoration>) -> Result<Self, PjaxError> {
        let compiled = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
            PjaxError::InvalidPattern { pattern: pattern.to_string(), source }
        })?;
        let mut decorations = decorations;
        decorations.reverse();
        Ok(Self { source: pattern.to_string(), pattern: compiled, decorations })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}

/// Holds rules in precedence order: the last configured rule comes first.
#[derive(Debug, Clone, Default)]
pub struct Middleware {
    rules: Vec<RouteRule>,
}

impl Middleware {
    /// Parses every decorator and compiles every pattern. Any invalid entry
    /// fails the whole configuration.
    pub fn new(config: &PjaxConfig) -> Result<Self, PjaxError> {
        let mut rules = config
            .urls
            .iter()
            .map(|(pattern, source)| {
                let decorations =
                    source.sources().iter().map(|s| Decoration::parse(s)).collect::<Result<Vec<_>, _>>()?;
                RouteRule::new(pattern, decorations)
            })
            .collect::<Result<Vec<_>, PjaxError>>()?;
        rules.reverse();
        tracing::debug!(rules = rules.len(), "PJAX middleware configured");
        Ok(Self { rules })
    }

    pub fn from_json_str(json: &str) -> Result<Self, PjaxError> {
        Self::new(&PjaxConfig::from_json_str(json)?)
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn matching_rules<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a RouteRule> + 'a {
        self.rules.iter().filter(move |rule| rule.matches(path))
    }

    pub fn process_request(&self, request: &mut Request) {
        strip_pjax_parameter(request);
    }

    /// Runs a deferred response through the decorations of every matching
    /// rule. Finalized responses are returned untouched.
    pub fn process_template_response(
        &self,
        request: &mut Request,
        response: Response,
    ) -> Result<Response, PjaxError> {
        if !response.is_deferred() {
            return Ok(response);
        }
        let path = request.path().to_string();
        let mut response = response;
        for rule in self.matching_rules(&path) {
            tracing::trace!(path = %path, pattern = rule.source(), "PJAX rule matched");
            for decoration in &rule.decorations {
                response = decoration.process(request, response)?;
            }
        }
        Ok(response)
    }
}
