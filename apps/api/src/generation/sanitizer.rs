//! Response sanitizer: strips model meta-commentary from completions.
//!
//! Models on the free tier routinely leak planning text ("Let's draft...",
//! "We need to...", word counts, `assistantfinal` channel markers) into the
//! answer. Cleanup is expressed as data: line rules drop whole lines, global
//! rules rewrite the rejoined text, and a prefix list removes boilerplate
//! headers. The cover letter and email passes use different presets: only
//! the cover letter keeps blank lines and collapses newline runs.

use std::sync::LazyLock;

use regex::Regex;

/// Phrases that mark a cover letter line as commentary.
pub const COVER_LETTER_DENYLIST: &[&str] = &[
    "analysis",
    "we need to",
    "the candidate",
    "candidate lacks",
    "let's draft",
    "provide bullet",
    "just cover letter",
    "here is",
    "cover letter:",
    "draft within",
    "max 300 words",
    "let's aim",
    "let's craft",
    "we should",
    "make it concise",
    "assistantfinal",
    "word letter",
    "background:",
    "skills.",
    "attach research",
    "candidate's background",
    "front-end skills",
    "backend, but",
    "let's do a",
    "format requirements",
    "return only",
];

/// Phrases that mark an email line as commentary.
pub const EMAIL_DENYLIST: &[&str] = &[
    "analysis",
    "here is",
    "email:",
    "based on",
    "this email",
    "the email should",
    "let's",
    "we should",
    "make it",
    "assistantfinal",
    "word email",
    "under 150 words",
];

static WORD_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d{2,3}[- ]?words?\b").expect("word count regex"));
static LETS_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Let's [^.!?]*[.!?]").expect("let's regex"));
static WE_SHOULD_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)We should [^.!?]*[.!?]").expect("we should regex"));
static CHANNEL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)assistantfinal").expect("channel marker regex"));
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline regex"));

/// Decides whether a single (already trimmed) line is dropped.
#[derive(Debug, Clone)]
pub enum LineRule {
    /// Drop lines whose lowercase form contains any of the phrases.
    Denylist(Vec<&'static str>),
    /// Drop lines shorter than `max_len` characters that are all digits or mention "word".
    ShortNoise { max_len: usize },
}

impl LineRule {
    pub fn rejects(&self, line: &str) -> bool {
        match self {
            Self::Denylist(phrases) => {
                let lower = line.to_lowercase();
                phrases.iter().any(|p| lower.contains(p))
            }
            Self::ShortNoise { max_len } => {
                line.chars().count() < *max_len
                    && (is_all_digits(line) || line.to_lowercase().contains("word"))
            }
        }
    }
}

fn is_all_digits(line: &str) -> bool {
    !line.is_empty() && line.chars().all(char::is_numeric)
}

/// Regex rewrite applied to the whole text after line filtering.
#[derive(Debug, Clone)]
pub struct GlobalRule {
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl GlobalRule {
    pub fn new(pattern: &Regex, replacement: &'static str) -> Self {
        Self {
            pattern: pattern.clone(),
            replacement,
        }
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

/// A complete sanitization preset.
#[derive(Debug, Clone)]
pub struct SanitizerRules {
    pub line_rules: Vec<LineRule>,
    /// Blank lines survive as paragraph separators when true.
    pub keep_blank_lines: bool,
    /// Applied in order.
    pub global_rules: Vec<GlobalRule>,
    /// Each stripped at most once, in order, only from the start of the text.
    pub strip_prefixes: Vec<&'static str>,
}

impl SanitizerRules {
    pub fn cover_letter() -> Self {
        Self {
            line_rules: vec![
                LineRule::Denylist(COVER_LETTER_DENYLIST.to_vec()),
                LineRule::ShortNoise { max_len: 10 },
            ],
            keep_blank_lines: true,
            global_rules: vec![
                GlobalRule::new(&WORD_COUNT, ""),
                GlobalRule::new(&LETS_SENTENCE, ""),
                GlobalRule::new(&WE_SHOULD_SENTENCE, ""),
                GlobalRule::new(&CHANNEL_MARKER, ""),
                GlobalRule::new(&EXCESS_NEWLINES, "\n\n"),
            ],
            strip_prefixes: vec!["Cover Letter:", "Here is your cover letter:"],
        }
    }

    pub fn email() -> Self {
        Self {
            line_rules: vec![
                LineRule::Denylist(EMAIL_DENYLIST.to_vec()),
                LineRule::ShortNoise { max_len: 5 },
            ],
            keep_blank_lines: false,
            global_rules: vec![
                GlobalRule::new(&WORD_COUNT, ""),
                GlobalRule::new(&LETS_SENTENCE, ""),
                GlobalRule::new(&CHANNEL_MARKER, ""),
            ],
            strip_prefixes: vec!["Email:", "Here is your email:"],
        }
    }

    pub fn with_line_rule(mut self, rule: LineRule) -> Self {
        self.line_rules.push(rule);
        self
    }

    pub fn with_global_rule(mut self, rule: GlobalRule) -> Self {
        self.global_rules.push(rule);
        self
    }

    fn keeps(&self, line: &str) -> bool {
        if line.is_empty() && !self.keep_blank_lines {
            return false;
        }
        !self.line_rules.iter().any(|rule| rule.rejects(line))
    }
}

/// Cleans a raw completion according to `rules`.
pub fn sanitize(raw: &str, rules: &SanitizerRules) -> String {
    let kept = raw
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| rules.keeps(line))
        .collect::<Vec<_>>()
        .join("\n");

    let mut content = rules
        .global_rules
        .iter()
        .fold(kept, |text, rule| rule.apply(&text));

    for prefix in &rules.strip_prefixes {
        if let Some(stripped) = content.strip_prefix(prefix) {
            content = stripped.trim().to_string();
        }
    }

    content
}

pub fn sanitize_cover_letter(raw: &str) -> String {
    sanitize(raw, &SanitizerRules::cover_letter())
}

pub fn sanitize_email(raw: &str) -> String {
    sanitize(raw, &SanitizerRules::email())
}
