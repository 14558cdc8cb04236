//! Quote-aware splitting of script lines into tokens and bundle commands.

/// Split one logical line into whitespace-delimited tokens.
///
/// A substring opened by `'` or `"` extends to the next occurrence of the same character and may
/// contain whitespace; the quote characters stay in the token (they are stripped from parameter
/// values later). The other quote character is literal while a quote is open. An unterminated
/// quote runs to the end of the line. There is no escaping.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut open_quote: Option<char> = None;

    for ch in line.chars() {
        match open_quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    open_quote = None;
                }
            }
            None if ch == '\'' || ch == '"' => {
                open_quote = Some(ch);
                current.push(ch);
            }
            None if ch.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Split `text` at every `sep` that is not inside a quoted substring. Pieces are trimmed; empty
/// pieces are kept so callers can decide whether they matter.
pub fn split_outside_quotes(text: &str, sep: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut open_quote: Option<char> = None;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match open_quote {
            Some(q) if ch == q => open_quote = None,
            Some(_) => {}
            None if ch == '\'' || ch == '"' => open_quote = Some(ch),
            None if ch == sep => {
                pieces.push(text[start..i].trim());
                start = i + ch.len_utf8();
            }
            None => {}
        }
    }
    pieces.push(text[start..].trim());
    pieces
}

/// Strip one layer of matching surrounding quotes, or a dangling opening quote.
pub fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(rest) = value.strip_prefix(q) {
            return rest.strip_suffix(q).unwrap_or(rest);
        }
    }
    value
}

#[cfg(test)]
#[path = "../../tests/unit/script/tokenize.rs"]
mod tests;
