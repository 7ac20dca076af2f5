//! PJAX protocol helpers: request inspection, cache-busting parameter
//! removal and template name transformation.

use crate::error::PjaxError;
use crate::request::Request;
use crate::response::TemplateSource;
use regex::Regex;
use std::sync::OnceLock;

/// Request header flagging a PJAX request.
pub const X_PJAX: http::HeaderName = http::HeaderName::from_static("x-pjax");
/// Request header naming the target container, as `#id`.
pub const X_PJAX_CONTAINER: http::HeaderName = http::HeaderName::from_static("x-pjax-container");
/// Response header carrying the canonical URL of the fragment.
pub const X_PJAX_URL: http::HeaderName = http::HeaderName::from_static("x-pjax-url");
/// Cache-busting query parameter added by the client.
pub const PJAX_PARAM: &str = "_pjax";

fn selector_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\S+$").unwrap())
}

fn pjax_param_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_pjax=[^&]+&?").unwrap())
}

pub fn is_pjax(request: &Request) -> bool {
    request.headers().contains_key(X_PJAX)
}

/// Validates a `#id` selector and returns the id.
pub fn parse_selector(selector: &str) -> Result<&str, PjaxError> {
    if selector_re().is_match(selector) {
        Ok(&selector[1..])
    } else {
        Err(PjaxError::InvalidSelector(selector.to_string()))
    }
}

/// The container id named by the `X-PJAX-Container` header.
pub fn pjax_container(request: &Request) -> Result<&str, PjaxError> {
    let selector = request.header(&X_PJAX_CONTAINER).ok_or(PjaxError::MissingContainer)?;
    parse_selector(selector)
}

/// Removes `_pjax=...` from a raw query string.
pub fn strip_pjax_qs_parameter(query_string: &str) -> String {
    pjax_param_re().replace_all(query_string, "").trim_end_matches('&').to_string()
}

/// Removes the cache-busting parameter from a PJAX request's query, both the
/// parsed values and the raw string. The removed value stays available
/// through [`Request::pjax_param`]. Other requests are left alone.
pub fn strip_pjax_parameter(request: &mut Request) {
    if !is_pjax(request) {
        return;
    }
    let Some(mut values) = request.query_mut().remove(PJAX_PARAM) else {
        return;
    };
    if let Some(value) = values.pop() {
        request.remember_pjax_param(value);
    }
    let stripped = strip_pjax_qs_parameter(request.query_string());
    tracing::trace!(path = request.path(), query = %stripped, "stripped _pjax parameter");
    request.set_query_string(stripped);
}

/// `"page.html"` becomes `"page-pjax.html"`, or `"page-pjax=main.html"`
/// with a container. Only the last extension of the file name is
/// considered; dots in directory names are left alone.
///
/// Distinct inputs give distinct names, with one exception: an
/// extension-less name paired with a dotted container reads like a name
/// with an extension, so `("a", Some("b.c"))` and `("a.c", Some("b"))` both
/// give `"a-pjax=b.c"`.
pub fn pjaxify_template_path(path: &str, container: Option<&str>) -> String {
    let marker = match container {
        Some(container) => format!("-pjax={container}"),
        None => "-pjax".to_string(),
    };
    let file_start = path.rfind('/').map_or(0, |slash| slash + 1);
    match path[file_start..].rfind('.') {
        Some(dot) => {
            let (stem, ext) = path.split_at(file_start + dot);
            format!("{stem}{marker}{ext}")
        }
        None => format!("{path}{marker}"),
    }
}

/// Maps `names` to `[f(n0), n0, f(n1), n1, ...]`.
pub fn transform_template_var<F>(f: F, names: &[String]) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    names.iter().flat_map(|name| [f(name), name.clone()]).collect()
}

fn template_names(template: &TemplateSource) -> Result<&[String], PjaxError> {
    match template {
        TemplateSource::Names(names) => Ok(names),
        TemplateSource::Document(_) => Err(PjaxError::TemplateNotNamed),
    }
}

/// Fragment-specific names for `template`, each followed by its original.
pub fn pjaxify_template_var(template: &TemplateSource) -> Result<Vec<String>, PjaxError> {
    let names = template_names(template)?;
    Ok(transform_template_var(|name| pjaxify_template_path(name, None), names))
}

/// Like [`pjaxify_template_var`], with the request's container id in the
/// derived names.
pub fn pjaxify_template_var_with_container(
    request: &Request,
    template: &TemplateSource,
) -> Result<Vec<String>, PjaxError> {
    let names = template_names(template)?;
    let container = pjax_container(request)?;
    Ok(transform_template_var(|name| pjaxify_template_path(name, Some(container)), names))
}
