use crate::literal::is_int;

// ----------------------------------------------------------------------------
// Helpers

/// Byte index of the first char matching `pred` that is not inside a `'...'`
/// or `"..."` literal. A backslash inside a literal escapes the next char.
fn find_unquoted(s: &str, pred: impl Fn(char) -> bool) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, ch) in s.char_indices() {
        match quote {
            None if pred(ch) => return Some(idx),
            None => {
                if ch == '"' || ch == '\'' {
                    quote = Some(ch);
                }
            }
            Some(_) if escaped => escaped = false,
            Some(q) => {
                if ch == q {
                    quote = None;
                } else if ch == '\\' {
                    escaped = true;
                }
            }
        }
    }
    None
}

pub fn strip_comment(line: &str) -> &str {
    match find_unquoted(line, |c| c == ';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

// ----------------------------------------------------------------------------
// Line lexer

/// Split a source line into tokens.
///
/// The first token is the mnemonic, or a label marked with a trailing `:`.
/// Whatever follows a label is lexed again as a statement, so labels and
/// instructions may share a line. Operands are comma separated; a trailing
/// comma yields one empty token.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = strip_comment(line).trim();
    while !rest.is_empty() {
        let end = find_unquoted(rest, |c| c.is_whitespace() || c == ':').unwrap_or(rest.len());
        let (head, tail) = rest.split_at(end);
        let tail = tail.trim_start();
        match tail.strip_prefix(':') {
            Some(tail) => {
                tokens.push(format!("{head}:"));
                rest = tail.trim_start();
            }
            None => {
                tokens.push(head.to_string());
                tokens.extend(operands(tail));
                break;
            }
        }
    }
    tokens
}

fn operands(mut rest: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    while !rest.is_empty() {
        match find_unquoted(rest, |c| c == ',') {
            Some(pos) => {
                tokens.push(rest[..pos].trim_end().to_string());
                rest = rest[pos + 1..].trim_start();
                if rest.is_empty() {
                    tokens.push(String::new());
                }
            }
            None => {
                tokens.push(rest.trim_end().to_string());
                break;
            }
        }
    }
    tokens
}

// ----------------------------------------------------------------------------
// Macros

/// `.def` table, applied in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Macros(Vec<(String, String)>);

impl Macros {
    pub fn new() -> Self {
        Macros(Vec::new())
    }

    pub fn define(&mut self, ident: &str, replacement: &str) {
        self.0.push((ident.to_string(), replacement.to_string()));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain text substitution. Scanning resumes after the inserted text, so
    /// a replacement is never expanded again by the same definition.
    pub fn expand(&self, line: &str) -> String {
        let mut line = line.to_string();
        for (ident, replacement) in &self.0 {
            if ident.is_empty() {
                continue;
            }
            let mut pos = 0;
            while let Some(found) = line[pos..].find(ident.as_str()) {
                let start = pos + found;
                line.replace_range(start..start + ident.len(), replacement);
                pos = start + replacement.len();
            }
        }
        line
    }
}

// ----------------------------------------------------------------------------
// Address operand

/// `[base]`, `[offset]`, `[base + offset]` or `[offset + base]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub base: Option<String>,
    pub offset: Option<String>,
}

impl Address {
    fn assign(&mut self, term: &str) -> Option<()> {
        if is_int(term) {
            if self.offset.is_some() {
                return None;
            }
            self.offset = Some(term.to_string());
        } else {
            if self.base.is_some() {
                return None;
            }
            let reg = term.strip_prefix('+').unwrap_or(term);
            self.base = Some(reg.to_string());
        }
        Some(())
    }

    pub fn parse(s: &str) -> Option<Address> {
        let inner = s.strip_prefix('[')?.strip_suffix(']')?;
        let mut addr = Address::default();

        // First term, sign optional
        let (sign, rest) = take_sign(inner.trim())?;
        if rest.is_empty() {
            return None;
        }
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '+' || c == '-')
            .unwrap_or(rest.len());
        addr.assign(&format!("{sign}{}", &rest[..end]))?;

        let rest = rest[end..].trim_start();
        if rest.is_empty() {
            return Some(addr);
        }

        // Second term, sign required
        let (sign, rest) = take_sign(rest)?;
        if sign.is_empty() || rest.is_empty() {
            return None;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        addr.assign(&format!("{sign}{}", &rest[..end]))?;

        match rest[end..].trim().is_empty() {
            true => Some(addr),
            false => None,
        }
    }
}

/// Split a leading `+`/`-` from a term; `None` for an empty term.
fn take_sign(s: &str) -> Option<(&str, &str)> {
    if s.is_empty() {
        return None;
    }
    match s.strip_prefix(['+', '-']) {
        Some(rest) => Some((&s[..1], rest.trim_start())),
        None => Some(("", s)),
    }
}
