//! Sub-field extraction inside the `PROMPT ANALYSIS:` span.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::PromptAnalysis;

// Horizontal whitespace only: the same-line value never spans into the next line.
static PRIMARY_CATEGORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Primary Category:[^\S\n]*([^\n]*)").expect("valid regex"));
static SECONDARY_CATEGORIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Secondary Categories:[^\S\n]*([^\n]*)").expect("valid regex"));
static INTENT_RECOGNITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Intent Recognition:[^\S\n]*([^\n]*)").expect("valid regex"));
static CATEGORY_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;\n]").expect("valid regex"));

const OPPORTUNITIES_LABEL: &str = "Enhancement Opportunities:";
const LABELS: [&str; 4] = [
    "Primary Category:",
    "Secondary Categories:",
    "Intent Recognition:",
    OPPORTUNITIES_LABEL,
];

/// Builds a [`PromptAnalysis`] from the analysis span. Missing or empty fields keep defaults.
///
/// A label with nothing after it on its line takes the block of lines below it instead,
/// up to a blank line, the next label or a section marker. Single-valued fields use the
/// first line of that block; secondary categories use all of it.
///
/// `section_markers` bounds the opportunities text when a section header leaked into it.
pub fn parse_analysis(span: &str, section_markers: &[&str]) -> PromptAnalysis {
    let mut analysis = PromptAnalysis::default();
    if let Some(v) = single_value(&PRIMARY_CATEGORY, span, section_markers) {
        analysis.primary_category = v.to_string();
    }
    analysis.secondary_categories = label_value(&SECONDARY_CATEGORIES, span, section_markers)
        .map(|v| match v {
            LabelValue::Inline(s) => split_categories(s),
            LabelValue::Block(lines) => split_categories(&lines.join("\n")),
        })
        .unwrap_or_default();
    if let Some(v) = single_value(&INTENT_RECOGNITION, span, section_markers) {
        analysis.intent_recognition = v.to_string();
    }
    if let Some(v) = opportunities(span, section_markers) {
        analysis.enhancement_opportunities = v.to_string();
    }
    analysis
}

enum LabelValue<'a> {
    Inline(&'a str),
    Block(Vec<&'a str>),
}

fn label_value<'a>(
    re: &Regex,
    span: &'a str,
    section_markers: &[&str],
) -> Option<LabelValue<'a>> {
    let caps = re.captures(span)?;
    let inline = caps.get(1).map_or("", |m| m.as_str().trim());
    if !inline.is_empty() {
        return Some(LabelValue::Inline(inline));
    }
    let end = caps.get(0)?.end();
    // first item is the (empty) remainder of the label line
    let block: Vec<&str> = span[end..]
        .lines()
        .skip(1)
        .map(str::trim)
        .skip_while(|l| l.is_empty())
        .take_while(|l| {
            !l.is_empty() && !starts_with_any(l, &LABELS) && !starts_with_any(l, section_markers)
        })
        .collect();
    (!block.is_empty()).then_some(LabelValue::Block(block))
}

fn single_value<'a>(re: &Regex, span: &'a str, section_markers: &[&str]) -> Option<&'a str> {
    match label_value(re, span, section_markers)? {
        LabelValue::Inline(s) => Some(s),
        LabelValue::Block(lines) => lines
            .first()
            .copied()
            .map(|l| l.strip_prefix("- ").unwrap_or(l).trim())
            .filter(|s| !s.is_empty()),
    }
}

fn starts_with_any(line: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| line.starts_with(p))
}

/// `"None"` (any case) and empty normalize to no categories.
pub fn split_categories(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    CATEGORY_SEPARATOR
        .split(raw)
        .map(|s| {
            let s = s.trim();
            s.strip_prefix("- ").unwrap_or(s)
        })
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn opportunities<'a>(span: &'a str, section_markers: &[&str]) -> Option<&'a str> {
    let start = span.find(OPPORTUNITIES_LABEL)? + OPPORTUNITIES_LABEL.len();
    let rest = &span[start..];
    let end = section_markers
        .iter()
        .filter_map(|m| rest.find(m))
        .min()
        .unwrap_or(rest.len());
    Some(rest[..end].trim()).filter(|s| !s.is_empty())
}
