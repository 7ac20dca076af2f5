//! Human-readable summary of a middleware configuration.

use crate::middleware::Middleware;
use std::fmt::Write;

/// Lists the rules in precedence order with their decorations in the order
/// they are applied, then which rules match each of `paths`.
pub fn describe(middleware: &Middleware, paths: &[String]) -> String {
    let mut out = String::new();
    let rules = middleware.rules();
    let _ = writeln!(out, "{} rule(s), highest precedence first:", rules.len());
    for (i, rule) in rules.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, rule.source());
        for decoration in rule.decorations() {
            let _ = writeln!(out, "       {decoration}");
        }
    }
    for path in paths {
        let matched: Vec<&str> = middleware.matching_rules(path).map(|rule| rule.source()).collect();
        if matched.is_empty() {
            let _ = writeln!(out, "{path}: no rules");
        } else {
            let _ = writeln!(out, "{path}: {}", matched.join(", "));
        }
    }
    out
}
