//! Rewrites a plot block body into the source that gets executed.

use super::PLOT_DIRECTIVE;
use regex::Regex;
use std::sync::OnceLock;

fn show_call_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"^(\s*)(?:plt|pyplot|matplotlib\.pyplot)\.show\(\s*\)\s*;?\s*$")
            .expect("show-call regex must compile")
    })
}

/// Strip the plotting directive and explicit `show()` calls.
///
/// An indented `show()` becomes `pass` so the enclosing suite stays valid.
pub fn prepare_plot_source(body: &str) -> String {
    let mut lines = Vec::new();

    for line in body.lines() {
        if line.trim() == PLOT_DIRECTIVE {
            continue;
        }
        if let Some(caps) = show_call_regex().captures(line) {
            let indent = caps.get(1).map_or("", |m| m.as_str());
            if !indent.is_empty() {
                lines.push(format!("{indent}pass"));
            }
            continue;
        }
        lines.push(line.to_string());
    }

    let source = lines.join("\n");
    source.trim_matches('\n').to_string()
}
