// src/normalizer/inference.rs
//! Pattern-based extraction of work mode, experience and salary from free text.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::WorkMode;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid pattern {p}: {e}")))
        .collect()
}

static HYBRID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\bhybrid\b",
        r"remote.{1,30}on.?site",
        r"on.?site.{1,30}remote",
        r"(in.?office|in.?person).{1,30}remote",
        r"remote.{1,30}(in.?office|in.?person)",
    ])
});

static REMOTE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\bremote\b",
        r"\bwork from home\b",
        r"\bwfh\b",
        r"\bvirtual\b",
        r"\btelework\b",
    ])
});

static REMOTE_NEGATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"not remote|no remote|not work from home").expect("valid negation pattern")
});

static ONSITE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\bon.?site\b",
        r"\bin.?office\b",
        r"\bin.?person\b",
        r"work location:\s*in person",
        r"must be in (the )?office",
    ])
});

static EXPERIENCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\d+\+?\s*(-|to)\s*\d+\+?\s*years?(\s*of)?\s*experience",
        r"(?i)minimum\s*of\s*\d+\+?\s*years?(\s*of)?\s*experience",
        r"(?i)\d+\+?\s*years?(\s*of)?\s*experience",
        r"(?i)experience[^.\n]{0,60}?\d+\+?\s*years?",
        r"(?i)at least \d+\+? years?",
    ])
});

const AMOUNT: &str = r"\d[\d,.]*\s?[kK]?";
const CURRENCY_SYMBOL: &str = r"[$£€₹₨]";
const CURRENCY_CODE: &str = r"\b(PKR|Rs|INR|USD|GBP|EUR)\b\.?";

static SALARY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let range = |prefix: &str| format!(r"{prefix}{AMOUNT}(\s*(-|to)\s*{prefix}{AMOUNT})?");
    let symbol_range = range(&format!(r"{CURRENCY_SYMBOL}?\s?"));
    let bare_range = range("");
    compile(&[
        &format!(r"(?i)salary\s*:?\s*{symbol_range}"),
        &format!(
            r"(?i){CURRENCY_SYMBOL}\s?{AMOUNT}(\s*(-|to)\s*{CURRENCY_SYMBOL}?\s?{AMOUNT})?\s*(per|/|a)\s*(year|month|annum|hour|yr|mo|hr)\b"
        ),
        &format!(r"(?i){bare_range}\s*{CURRENCY_CODE}"),
        &format!(r"(?i){CURRENCY_CODE}\s*{bare_range}"),
        &format!(r"(?i)salary range[^.\n]*?{bare_range}"),
    ])
});

/// Classify work mode. Precedence: explicit remote flag, hybrid cues,
/// remote cues (unless negated), onsite cues, otherwise unknown.
pub fn infer_work_mode(explicit_remote: Option<bool>, text: &str) -> WorkMode {
    if explicit_remote == Some(true) {
        return WorkMode::Remote;
    }

    let text = text.to_lowercase();

    if HYBRID_PATTERNS.iter().any(|p| p.is_match(&text)) {
        return WorkMode::Hybrid;
    }

    if REMOTE_PATTERNS.iter().any(|p| p.is_match(&text)) && !REMOTE_NEGATION.is_match(&text) {
        return WorkMode::Remote;
    }

    if ONSITE_PATTERNS.iter().any(|p| p.is_match(&text)) {
        return WorkMode::Onsite;
    }

    WorkMode::NotSpecified
}

pub fn extract_experience(text: &str) -> Option<String> {
    first_match(&EXPERIENCE_PATTERNS, text)
}

pub fn extract_salary(text: &str) -> Option<String> {
    first_match(&SALARY_PATTERNS, text)
}

fn first_match(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|p| p.find(text))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
