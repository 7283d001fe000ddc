//! Approximate, line-at-a-time syntax highlighting.
//!
//! This is a fixed pipeline of regex substitutions, not a tokenizer. Each pass
//! wraps its matches in marker code points; later passes run over the output
//! of earlier ones and may wrap text that is already wrapped. Keywords inside
//! string literals get highlighted, quotes are never balanced across lines, and
//! that is accepted.

use regex::Regex;
use std::sync::LazyLock;

const CLOSE: char = '\u{E001}';
const OPEN_KEYWORD: char = '\u{E010}';
const OPEN_STRING: char = '\u{E011}';
const OPEN_FUNCTION: char = '\u{E012}';
const OPEN_COMMENT: char = '\u{E013}';
const OPEN_NUMBER: char = '\u{E014}';
const OPEN_MEMBER: char = '\u{E015}';

const PYTHON_KEYWORDS: &[&str] = &[
    "def", "class", "import", "from", "return", "if", "elif", "else", "for", "while", "in", "not",
    "and", "or", "is", "with", "as", "try", "except", "finally", "raise", "lambda", "yield",
    "async", "await", "pass", "None", "True", "False", "self",
];

const C_FAMILY_KEYWORDS: &[&str] = &[
    "const",
    "let",
    "var",
    "await",
    "async",
    "return",
    "import",
    "export",
    "from",
    "function",
    "class",
    "interface",
    "type",
    "new",
    "if",
    "else",
    "for",
    "while",
    "switch",
    "case",
    "break",
    "continue",
    "default",
    "try",
    "catch",
    "throw",
    "typeof",
    "extends",
    "null",
    "undefined",
    "true",
    "false",
    "this",
];

static PYTHON_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex(PYTHON_KEYWORDS));
static C_FAMILY_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex(C_FAMILY_KEYWORDS));
static STRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["'`].*?["'`]"#).expect("Should compile: STRING_RE"));
static CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\w+)(\s*\()").expect("Should compile: CALL_RE"));
static C_FAMILY_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//.*$").expect("Should compile: C_FAMILY_COMMENT_RE"));
static PYTHON_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#.*$").expect("Should compile: PYTHON_COMMENT_RE"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").expect("Should compile: NUMBER_RE"));
static MEMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\w+").expect("Should compile: MEMBER_RE"));

fn keyword_regex(keywords: &[&str]) -> Regex {
    let pattern = format!(r"\b(?:{})\b", keywords.join("|"));
    Regex::new(&pattern).expect("Should compile: keyword alternation")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    CFamily,
}

impl Language {
    /// Anything that is not recognizably Python falls back to the C-family set.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "py" | "python" | "python3" => Self::Python,
            _ => Self::CFamily,
        }
    }

    fn keyword_re(self) -> &'static Regex {
        match self {
            Self::Python => &*PYTHON_KEYWORD_RE,
            Self::CFamily => &*C_FAMILY_KEYWORD_RE,
        }
    }

    fn comment_re(self) -> &'static Regex {
        match self {
            Self::Python => &*PYTHON_COMMENT_RE,
            Self::CFamily => &*C_FAMILY_COMMENT_RE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    String,
    Function,
    Comment,
    Number,
    Member,
}

impl TokenKind {
    fn from_marker(ch: char) -> Option<Self> {
        match ch {
            OPEN_KEYWORD => Some(Self::Keyword),
            OPEN_STRING => Some(Self::String),
            OPEN_FUNCTION => Some(Self::Function),
            OPEN_COMMENT => Some(Self::Comment),
            OPEN_NUMBER => Some(Self::Number),
            OPEN_MEMBER => Some(Self::Member),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: Option<TokenKind>,
    pub text: String,
}

/// Wrap keyword, string, call, comment, number, and member-access substrings
/// of `line` in style markers. Pure; never fails.
pub fn highlight_line(line: &str, language: &str) -> String {
    let language = Language::from_tag(language);
    let line = sanitize(line);

    let out = wrap_all(language.keyword_re(), &line, OPEN_KEYWORD);
    let out = wrap_all(&STRING_RE, &out, OPEN_STRING);
    let out = CALL_RE
        .replace_all(&out, format!("{OPEN_FUNCTION}${{1}}{CLOSE}${{2}}").as_str())
        .into_owned();
    let out = wrap_all(language.comment_re(), &out, OPEN_COMMENT);
    let out = wrap_all(&NUMBER_RE, &out, OPEN_NUMBER);
    wrap_all(&MEMBER_RE, &out, OPEN_MEMBER)
}

/// Highlight and split into styled fragments in one go.
pub fn highlight_fragments(line: &str, language: &str) -> Vec<Fragment> {
    parse_markup(&highlight_line(line, language))
}

fn wrap_all(re: &Regex, text: &str, open: char) -> String {
    re.replace_all(text, format!("{open}${{0}}{CLOSE}").as_str())
        .into_owned()
}

fn is_marker(ch: char) -> bool {
    ('\u{E000}'..='\u{E01F}').contains(&ch)
}

fn sanitize(line: &str) -> String {
    line.chars().filter(|ch| !is_marker(*ch)).collect()
}

/// Split marked-up text into fragments. The innermost open marker decides the
/// kind of a run; stray close markers are dropped and unclosed markers extend
/// to the end of the line.
pub fn parse_markup(markup: &str) -> Vec<Fragment> {
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut stack: Vec<TokenKind> = Vec::new();
    let mut current = String::new();

    for ch in markup.chars() {
        if let Some(kind) = TokenKind::from_marker(ch) {
            push_fragment(&mut fragments, stack.last().copied(), &mut current);
            stack.push(kind);
        } else if ch == CLOSE {
            push_fragment(&mut fragments, stack.last().copied(), &mut current);
            stack.pop();
        } else if !is_marker(ch) {
            current.push(ch);
        }
    }
    push_fragment(&mut fragments, stack.last().copied(), &mut current);
    fragments
}

fn push_fragment(fragments: &mut Vec<Fragment>, kind: Option<TokenKind>, text: &mut String) {
    if text.is_empty() {
        return;
    }
    let text = std::mem::take(text);
    match fragments.last_mut() {
        Some(last) if last.kind == kind => last.text.push_str(&text),
        _ => fragments.push(Fragment { kind, text }),
    }
}
