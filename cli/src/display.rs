//! Human-readable rendering of flow records for stdout.

use prompthancer::{EnhancementResult, ModificationResult};

/// Indent for multi-line field values.
const INDENT: &str = "  ";

/// Truncates a string to at most `max` chars; appends "..." when truncated. UTF-8 safe.
/// `max == 0` disables truncation.
pub fn truncate_display(s: &str, max: usize) -> String {
    const SUFFIX: &str = "...";
    if max == 0 || s.chars().count() <= max {
        return s.to_string();
    }
    if max <= SUFFIX.len() {
        return s.chars().take(max).collect();
    }
    format!(
        "{}{}",
        s.chars().take(max - SUFFIX.len()).collect::<String>(),
        SUFFIX
    )
}

fn indented(text: &str) -> String {
    text.lines()
        .map(|l| format!("{}{}", INDENT, l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Analysis header, enhanced prompt and explanation; `max` bounds the echoed original prompt.
pub fn format_enhancement(r: &EnhancementResult, max: usize) -> String {
    let a = &r.prompt_analysis;
    let secondary = if a.secondary_categories.is_empty() {
        "none".to_string()
    } else {
        a.secondary_categories.join(", ")
    };
    let lines = vec![
        format!("Original: {}", truncate_display(&r.original_prompt, max)),
        format!("Category: {} (secondary: {})", a.primary_category, secondary),
        format!("Intent: {}", a.intent_recognition),
        "Opportunities:".to_string(),
        indented(&a.enhancement_opportunities),
        String::new(),
        "Enhanced prompt:".to_string(),
        indented(&r.enhanced_prompt),
        String::new(),
        "Explanation:".to_string(),
        indented(&r.enhancement_explanation),
    ];
    lines.join("\n")
}

pub fn format_modification(r: &ModificationResult) -> String {
    r.modified_prompt.clone()
}
