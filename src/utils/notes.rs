//! Notes text extraction.
//!
//! Report notes arrive from the service as HTML fragments. List views only
//! have room for plain text, so tags are stripped and common entities
//! decoded before display.

use log::*;
use regex::Regex;

/// Strip HTML tags from a notes fragment and decode the entities the rich
/// text editor commonly emits. Block-level closers become newlines so
/// paragraphs stay separated.
///
pub fn strip_html(notes: &str) -> String {
    if notes.is_empty() {
        return String::new();
    }

    let mut text = notes.to_string();
    for (pattern, replacement) in [
        (r"(?i)<br\s*/?>", "\n"),
        (r"(?i)</(p|div|li|tr|h[1-6])>", "\n"),
        (r"<[^>]+>", ""),
    ] {
        let re = match Regex::new(pattern) {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to compile regex pattern '{}': {}", pattern, e);
                continue;
            }
        };
        text = re.replace_all(&text, replacement).to_string();
    }

    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    // Collapse runs of blank lines and trim the edges
    let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    while lines.first().map_or(false, |l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().map_or(false, |l| l.is_empty()) {
        lines.pop();
    }
    let mut result = Vec::with_capacity(lines.len());
    let mut previous_blank = false;
    for line in lines {
        let blank = line.is_empty();
        if !(blank && previous_blank) {
            result.push(line);
        }
        previous_blank = blank;
    }
    result.join("\n")
}
