use crate::filter::expr::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Name(String),
    Symbol(&'static str),
    Regex(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Longest symbols first so that `===` wins over `==`.
const SYMBOLS: [&str; 17] = [
    "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "<", ">", "!", "+", "-", "*", "/", "%",
    "~",
];

pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let offset = pos;
        let token = match c {
            b'(' => single(&mut pos, Token::LParen),
            b')' => single(&mut pos, Token::RParen),
            b'[' => single(&mut pos, Token::LBracket),
            b']' => single(&mut pos, Token::RBracket),
            b',' => single(&mut pos, Token::Comma),
            b'.' if !next_is_digit(bytes, pos) => single(&mut pos, Token::Dot),
            b'\'' | b'"' => Token::Str(string(source, &mut pos)?),
            b'0'..=b'9' | b'.' => number(source, &mut pos)?,
            c if c == b'_' || c.is_ascii_alphabetic() => {
                let start = pos;
                while pos < bytes.len() && (bytes[pos] == b'_' || bytes[pos].is_ascii_alphanumeric())
                {
                    pos += 1;
                }
                Token::Name(source[start..pos].to_string())
            }
            b'/' if regex_allowed(&tokens) => Token::Regex(regex(source, &mut pos)?),
            _ => {
                let rest = &source[pos..];
                let Some(symbol) = SYMBOLS.iter().find(|s| rest.starts_with(**s)) else {
                    let ch = rest.chars().next().unwrap_or('?');
                    return Err(ParseError::new(format!("unexpected character '{ch}'"), offset));
                };
                pos += symbol.len();
                Token::Symbol(symbol)
            }
        };

        tokens.push(Spanned { token, offset });
    }

    tokens.push(Spanned {
        token: Token::Eof,
        offset: source.len(),
    });

    Ok(tokens)
}

fn single(pos: &mut usize, token: Token) -> Token {
    *pos += 1;
    token
}

fn next_is_digit(bytes: &[u8], pos: usize) -> bool {
    bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)
}

/// A `/` starts a regex literal only right after `matches`.
fn regex_allowed(tokens: &[Spanned]) -> bool {
    matches!(tokens.last(), Some(Spanned { token: Token::Name(name), .. }) if name == "matches")
}

fn string(source: &str, pos: &mut usize) -> Result<String, ParseError> {
    let start = *pos;
    let mut chars = source[start..].char_indices();
    let Some((_, quote)) = chars.next() else {
        return Err(ParseError::new("unterminated string", start));
    };

    let mut value = String::new();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, escaped)) => value.push(escaped),
                None => break,
            },
            ch if ch == quote => {
                *pos = start + i + ch.len_utf8();
                return Ok(value);
            }
            ch => value.push(ch),
        }
    }

    Err(ParseError::new("unterminated string", start))
}

fn number(source: &str, pos: &mut usize) -> Result<Token, ParseError> {
    let bytes = source.as_bytes();
    let start = *pos;
    let mut is_float = false;

    while *pos < bytes.len() {
        match bytes[*pos] {
            b'0'..=b'9' | b'_' => *pos += 1,
            b'.' if !is_float && next_is_digit(bytes, *pos) => {
                is_float = true;
                *pos += 1;
            }
            b'e' | b'E' if *pos > start => {
                is_float = true;
                *pos += 1;
                if matches!(bytes.get(*pos), Some(b'+' | b'-')) {
                    *pos += 1;
                }
            }
            _ => break,
        }
    }

    let text: String = source[start..*pos].chars().filter(|c| *c != '_').collect();
    let invalid = || ParseError::new(format!("invalid number '{text}'"), start);

    if is_float {
        text.parse().map(Token::Float).map_err(|_| invalid())
    } else {
        text.parse().map(Token::Int).map_err(|_| invalid())
    }
}

/// `/pattern/flags` as in PCRE; the delimiter may be escaped inside.
fn regex(source: &str, pos: &mut usize) -> Result<String, ParseError> {
    let start = *pos;
    let bytes = source.as_bytes();
    let mut i = start + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'/' => {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                *pos = i;
                return Ok(source[start..i].to_string());
            }
            _ => i += 1,
        }
    }

    Err(ParseError::new("unterminated regular expression", start))
}
