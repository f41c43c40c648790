use crate::{
    error::Fault,
    interpreter::palette::{self, Channel},
    token::{Directive, Keyword, Token},
};

/// Turns source text into a flat token sequence.
///
/// The scan is a single forward pass by character position. Statement
/// keywords that carry a same-line payload (`flag`, `audit`, `dump`,
/// `existing`, `watch`, `color`, `embed`) have that payload validated
/// here and attached as a directive token, so the evaluator never has
/// to re-read source text.
///
/// # Errors
///
/// Returns [`Fault::UnterminatedString`] when a string literal is still
/// open at the end of input and [`Fault::DanglingWatch`] when a `watch`
/// statement has no newline after its name.
///
/// # Example
///
/// ```
/// use sapp::{interpreter::lexer::tokenize, token::Token};
///
/// // The decimal point only belongs to a number when a digit follows,
/// // so `5.toString` is an integer, a dot, and a reference.
/// let tokens = tokenize("5.toString").unwrap();
/// assert_eq!(tokens,
///            vec![Token::Integer(5),
///                 Token::Dot,
///                 Token::Reference("toString".to_owned())]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, Fault> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\n' || c == ';' {
            i += 1;
        } else if c == '/' && chars.get(i + 1) == Some(&'/') {
            i = skip_comment(&chars, i);
        } else if "+-*/%".contains(c) {
            if chars.get(i + 1) == Some(&'=') {
                tokens.push(Token::Assignment(format!("{c}=")));
                i += 2;
            } else {
                tokens.push(Token::MathOperator(c));
                i += 1;
            }
        } else if c == '=' {
            if chars.get(i + 1) == Some(&'=') {
                tokens.push(Token::EqualityOperator("==".to_owned()));
                i += 2;
            } else {
                tokens.push(Token::Assignment("=".to_owned()));
                i += 1;
            }
        } else if c == '<' || c == '>' {
            if chars.get(i + 1) == Some(&'=') {
                tokens.push(Token::EqualityOperator(format!("{c}=")));
                i += 2;
            } else {
                tokens.push(Token::EqualityOperator(c.to_string()));
                i += 1;
            }
        } else if "!&|^".contains(c) {
            if chars.get(i + 1) == Some(&'=') {
                tokens.push(Token::EqualityOperator(format!("{c}=")));
                i += 2;
            } else {
                tokens.push(Token::LogicOperator(c));
                i += 1;
            }
        } else if c == '[' || c == ']' {
            tokens.push(Token::ListBracket(c));
            i += 1;
        } else if c == '{' || c == '}' {
            tokens.push(Token::DictBracket(c));
            i += 1;
        } else if c == '(' || c == ')' {
            tokens.push(Token::Parenthesis(c));
            i += 1;
        } else if c == '.' && chars.get(i + 1) == Some(&'.') && chars.get(i + 2) == Some(&'.') {
            tokens.push(Token::Ellipsis);
            i += 3;
        } else if c == '.' {
            tokens.push(Token::Dot);
            i += 1;
        } else if c == ',' {
            tokens.push(Token::Separator);
            i += 1;
        } else if c == ':' {
            tokens.push(Token::Symbol(c));
            i += 1;
        } else if c == '"' {
            let (token, next) = scan_string(&chars, i)?;
            tokens.push(token);
            i = next;
        } else if c.is_ascii_digit() {
            let (token, next) = scan_number(&chars, i);
            tokens.push(token);
            i = next;
        } else if let Some(next) = scan_keyword(&chars, i, &mut tokens)? {
            i = next;
        } else {
            i = scan_reference(&chars, i, &mut tokens);
        }
    }

    Ok(tokens)
}

/// Splits text into lines while keeping string literals whole.
///
/// Literal `\n` spellings become real newlines first. The split then
/// walks backward, merging a line into its predecessor while an odd
/// number of unescaped quotes says the predecessor left a string open.
///
/// # Example
///
/// ```
/// use sapp::interpreter::lexer::break_lines;
///
/// let lines = break_lines("x = \"a\nb\"\ny = 1");
/// assert_eq!(lines, vec!["x = \"a\nb\"".to_owned(), "y = 1".to_owned()]);
/// ```
#[must_use]
pub fn break_lines(text: &str) -> Vec<String> {
    let data = text.replace("\\n", "\n");
    let mut lines: Vec<String> = data.split('\n').map(str::to_owned).collect();

    let mut in_string = false;
    let mut i = lines.len();
    while i > 0 {
        i -= 1;
        let toggles = unescaped_quotes(&lines[i]) % 2 == 1;
        if in_string && i + 1 < lines.len() {
            let next = lines.remove(i + 1);
            lines[i].push('\n');
            lines[i].push_str(&next);
        }
        if toggles {
            in_string = !in_string;
        }
    }

    lines
}

fn unescaped_quotes(line: &str) -> usize {
    let mut count = 0;
    let mut previous = '\0';
    for c in line.chars() {
        if c == '"' && previous != '\\' {
            count += 1;
        }
        previous = c;
    }
    count
}

/// Consumes a `//` comment up to the next newline that is not inside a
/// quoted string, or to the end of input.
fn skip_comment(chars: &[char], mut i: usize) -> usize {
    let mut in_string = false;
    while i < chars.len() {
        if chars[i] == '"' && (i == 0 || chars[i - 1] != '\\') {
            in_string = !in_string;
        }
        if chars[i] == '\n' && !in_string {
            break;
        }
        i += 1;
    }
    i
}

fn scan_string(chars: &[char], start: usize) -> Result<(Token, usize), Fault> {
    let mut i = start + 1;
    while i < chars.len() {
        if chars[i] == '"' && chars[i - 1] != '\\' {
            // the quotes stay part of the value
            let text: String = chars[start..=i].iter().collect();
            return Ok((Token::Str(text), i + 1));
        }
        i += 1;
    }
    Err(Fault::UnterminatedString)
}

fn scan_number(chars: &[char], start: usize) -> (Token, usize) {
    let mut text = String::new();
    let mut decimal = false;
    let mut i = start;

    while i < chars.len() && chars[i].is_ascii_digit() {
        text.push(chars[i]);
        i += 1;
        if i >= chars.len() {
            break;
        }
        // one decimal point, and only when a digit follows it
        if chars[i] == '.' && !decimal && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()) {
            text.push('.');
            decimal = true;
            i += 1;
        }
    }

    let token = if decimal {
        Token::Float(text.parse().unwrap_or(0.0))
    } else {
        match text.parse::<i64>() {
            Ok(value) => Token::Integer(value),
            // digit runs that overflow 64 bits degrade to a float
            Err(_) => Token::Float(text.parse().unwrap_or(0.0)),
        }
    };
    (token, i)
}

/// Tries every keyword, in table order, as a prefix of the input at `at`.
///
/// There is no word-boundary requirement, so `format` lexes as the
/// keyword `for` followed by the reference `mat`. On a match the keyword
/// token is pushed, any payload the keyword takes is lexed, and the new
/// scan position is returned.
fn scan_keyword(chars: &[char],
                at: usize,
                tokens: &mut Vec<Token>)
                -> Result<Option<usize>, Fault> {
    for keyword in Keyword::ALL {
        let text = keyword.text();
        if !matches_at(chars, at, text) {
            continue;
        }
        tokens.push(Token::Keyword(keyword));
        let after = at + text.len();
        let next = match keyword {
            Keyword::Flag => lex_flag(chars, after, tokens),
            Keyword::Audit => lex_trailing(chars, after, tokens, Directive::Audit),
            Keyword::Dump => lex_trailing(chars, after, tokens, Directive::Dump),
            Keyword::Existing => lex_trailing(chars, after, tokens, Directive::Existing),
            Keyword::Watch => lex_watch(chars, after, tokens)?,
            Keyword::Color => lex_color(chars, after, tokens),
            Keyword::Embed => lex_embed(chars, after, tokens),
            _ => after,
        };
        return Ok(Some(next));
    }
    Ok(None)
}

fn matches_at(chars: &[char], at: usize, text: &str) -> bool {
    text.chars()
        .enumerate()
        .all(|(offset, expected)| chars.get(at + offset) == Some(&expected))
}

fn line_end(chars: &[char], from: usize) -> usize {
    (from..chars.len()).find(|&i| chars[i] == '\n')
                       .unwrap_or(chars.len())
}

/// Lexes the rest-of-line payload of `audit`, `dump`, and `existing`.
/// Without a separating space the keyword stands alone.
fn lex_trailing(chars: &[char],
                after: usize,
                tokens: &mut Vec<Token>,
                directive: fn(String) -> Directive)
                -> usize {
    if chars.get(after) != Some(&' ') {
        return after;
    }
    let end = line_end(chars, after + 1);
    let payload: String = chars[after + 1..end].iter().collect();
    tokens.push(Token::Directive(directive(payload)));
    end
}

/// Lexes a `flag` statement. The whole line is consumed; without both a
/// flag name and a setting word no config token is produced.
fn lex_flag(chars: &[char], after: usize, tokens: &mut Vec<Token>) -> usize {
    let end = line_end(chars, after);
    let rest: String = chars[after..end].iter().collect();
    let mut words = rest.split(' ').filter(|word| !word.is_empty());
    if let (Some(name), Some(setting)) = (words.next(), words.next()) {
        tokens.push(Token::Config { name:    name.to_owned(),
                                    setting: setting.to_owned(), });
    }
    end
}

/// Lexes a `watch` statement: one separating character, then the name up
/// to the end of the line. A watch with no newline anywhere after the
/// name would observe nothing, which is a fault.
fn lex_watch(chars: &[char],
             after: usize,
             tokens: &mut Vec<Token>)
             -> Result<usize, Fault> {
    if after >= chars.len() {
        return Err(Fault::DanglingWatch);
    }
    let start = after + 1;
    let end = line_end(chars, start);
    if end >= chars.len() {
        return Err(Fault::DanglingWatch);
    }
    let name: String = chars[start..end].iter().collect();
    tokens.push(Token::Directive(Directive::Watch(name)));
    Ok(end)
}

/// Lexes a `color` statement. The line is consumed either way; only a
/// recognized channel word plus a resolvable color produce a directive.
fn lex_color(chars: &[char], after: usize, tokens: &mut Vec<Token>) -> usize {
    if chars.get(after) != Some(&' ') {
        return after;
    }
    let end = line_end(chars, after + 1);
    let rest: String = chars[after + 1..end].iter().collect();
    let mut words = rest.split(' ');
    let channel = words.next().unwrap_or_default();
    let color = words.next().unwrap_or_default();
    if Channel::from_name(channel).is_some()
        && let Some(sequence) = palette::resolve_color(color)
    {
        tokens.push(Token::Directive(Directive::Color { channel: channel.to_owned(),
                                                        sequence }));
    }
    end
}

/// Lexes the block of an `embed` statement: `{` directly after the
/// keyword or after one space, to its depth-matched `}`. A missing block
/// leaves the keyword alone; a missing close brace takes everything to
/// the end of input.
fn lex_embed(chars: &[char], after: usize, tokens: &mut Vec<Token>) -> usize {
    let brace = match chars.get(after) {
        Some(&'{') => after,
        Some(&' ') if chars.get(after + 1) == Some(&'{') => after + 1,
        _ => return after,
    };

    let mut depth = 1u32;
    let mut close = chars.len();
    let mut i = brace + 1;
    while i < chars.len() {
        match chars[i] {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = i;
                    break;
                }
            },
            _ => {},
        }
        i += 1;
    }

    let mut block: &[char] = &chars[brace + 1..close];
    // the newline opening the block and the one closing it are framing,
    // not content
    if block.first() == Some(&'\n') {
        block = &block[1..];
    }
    if block.last() == Some(&'\n') {
        block = &block[..block.len() - 1];
    }
    tokens.push(Token::EscapeBlock(block.iter().collect()));

    if close < chars.len() { close + 1 } else { close }
}

fn scan_reference(chars: &[char], start: usize, tokens: &mut Vec<Token>) -> usize {
    let mut end = start;
    while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
        end += 1;
    }
    if end == start {
        // not part of any token class; skip the character
        return start + 1;
    }
    tokens.push(Token::Reference(chars[start..end].iter().collect()));
    end
}
