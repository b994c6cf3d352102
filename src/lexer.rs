use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use strum::{Display, EnumIter};

use crate::errors::ParseError;

/// Characters allowed inside a name after its first letter, besides letters and digits
const NAME_SPECIALS: [char; 5] = ['-', '.', '_', ':', '/'];

/// The kind of a token read from the bib file.
/// Remember, that bib file entry looks as follows:
///
/// ```tex
/// @Book{works:4,
///   author     = {Shakespeare, William},
///   year       = 1609,
///   title      = "Sonn" # "ets",
/// }
/// ```
///
/// In this case, the lexer would emit tokens of the following kinds:
/// Start, Name("Book"), LeftBrace, Name("works:4"), Comma,
/// Name("author"), Equal, String("Shakespeare, William"), Comma,
/// Name("year"), Equal, Number("1609"), Comma,
/// Name("title"), Equal, String("Sonn"), Concatenation, String("ets"), Comma,
/// RightBrace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TokenKind {
    /// `@`
    Start,
    /// a bare word like `article` or `DBLP:books/lib/Knuth97`
    Name,
    /// a run of digits
    Number,
    /// text in `"double quotes"` or in `{braces}` of a field value
    String,
    /// `{` opening an entry
    LeftBrace,
    /// `}` closing an entry
    RightBrace,
    /// `,`
    Comma,
    /// `#`
    Concatenation,
    /// `=`
    Equal,
    /// pseudo-token for the end of the source
    EndOfInput,
}

/// A token is one semantic unit read from the bib file.
/// `value` is set for Name, Number and String tokens.
/// Be aware that Token is just the data contract between lexer and parser
/// and not meant to be externally visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) value: Option<String>,
}

impl Token {
    fn bare(kind: TokenKind) -> Token {
        Token { kind, value: None }
    }

    fn with_value(kind: TokenKind, value: String) -> Token {
        Token {
            kind,
            value: Some(value),
        }
    }
}

/// Location in the source, both 1-based
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} col {}", self.line, self.column)
    }
}

/// Lazy iterator over the tokens of a source string
pub(crate) struct Lexer<'s> {
    chars: Peekable<Chars<'s>>,
    comment_markers: &'s [char],
    lineno: usize,
    /// characters consumed on the current line
    colno: usize,
    /// 0 outside of entries, 1 inside an entry, more inside a braced value
    depth: usize,
    finished: bool,
}

impl<'s> Lexer<'s> {
    pub(crate) fn new(src: &'s str, comment_markers: &'s [char]) -> Lexer<'s> {
        Lexer {
            chars: src.chars().peekable(),
            comment_markers,
            lineno: 1,
            colno: 0,
            depth: 0,
            finished: false,
        }
    }

    /// Position of the next, not yet consumed character
    pub(crate) fn location(&self) -> Position {
        Position {
            line: self.lineno,
            column: self.colno + 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let chr = self.chars.next()?;
        if chr == '\n' {
            self.lineno += 1;
            self.colno = 0;
        } else {
            self.colno += 1;
        }
        Some(chr)
    }

    fn bump_while<F: Fn(char) -> bool>(&mut self, value: &mut String, accept: F) {
        while let Some(chr) = self.peek() {
            if !accept(chr) {
                break;
            }
            value.push(chr);
            self.bump();
        }
    }

    fn read_name(&mut self) -> Token {
        let mut value = String::new();
        self.bump_while(&mut value, |c| c.is_alphanumeric() || NAME_SPECIALS.contains(&c));
        Token::with_value(TokenKind::Name, value)
    }

    fn read_number(&mut self) -> Token {
        let mut value = String::new();
        self.bump_while(&mut value, |c| c.is_ascii_digit());
        Token::with_value(TokenKind::Number, value)
    }

    /// Escape sequences are kept verbatim. A quote preceded by an odd number
    /// of backslashes is part of the string, so `"C:\\"` ends after `\\`.
    fn read_quoted(&mut self) -> Token {
        self.bump();
        let mut value = String::new();
        let mut escaped = false;
        while let Some(chr) = self.bump() {
            if chr == '"' && !escaped {
                break;
            }
            value.push(chr);
            escaped = chr == '\\' && !escaped;
        }
        Token::with_value(TokenKind::String, value)
    }

    /// Reads a field value in braces. Nested braces are part of the value,
    /// the outermost pair is not.
    fn read_braced(&mut self) -> Token {
        self.bump();
        self.depth += 1;
        let mut value = String::new();
        while let Some(chr) = self.bump() {
            match chr {
                '{' => self.depth += 1,
                '}' => {
                    self.depth -= 1;
                    if self.depth == 1 {
                        break;
                    }
                }
                _ => {}
            }
            value.push(chr);
        }
        Token::with_value(TokenKind::String, value)
    }

    fn skip_comment(&mut self) {
        while let Some(chr) = self.peek() {
            if chr == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn punctuation(&mut self, kind: TokenKind) -> Token {
        self.bump();
        Token::bare(kind)
    }

    /// lex() skips whitespace and comments and returns the next token
    fn lex(&mut self) -> Option<Result<(Token, Position), ParseError>> {
        loop {
            let chr = self.peek()?;
            let pos = self.location();
            let token = match chr {
                '@' => self.punctuation(TokenKind::Start),
                c if c.is_alphabetic() => self.read_name(),
                c if c.is_ascii_digit() => self.read_number(),
                '"' => self.read_quoted(),
                '{' if self.depth == 0 => {
                    self.depth = 1;
                    self.punctuation(TokenKind::LeftBrace)
                }
                '{' => self.read_braced(),
                '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    self.punctuation(TokenKind::RightBrace)
                }
                ',' => self.punctuation(TokenKind::Comma),
                '#' => self.punctuation(TokenKind::Concatenation),
                '=' => self.punctuation(TokenKind::Equal),
                c if self.comment_markers.contains(&c) => {
                    self.skip_comment();
                    continue;
                }
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                c => return Some(Err(ParseError::unrecognizable(pos, c))),
            };
            return Some(Ok((token, pos)));
        }
    }
}

impl<'s> Iterator for Lexer<'s> {
    type Item = Result<(Token, Position), ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.lex();
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DEFAULT_MARKERS: [char; 1] = ['%'];

    fn lex_all(src: &str) -> Result<Vec<Token>, ParseError> {
        Lexer::new(src, &DEFAULT_MARKERS)
            .map(|item| item.map(|(token, _pos)| token))
            .collect()
    }

    fn name(s: &str) -> Token {
        Token::with_value(TokenKind::Name, s.to_string())
    }

    fn string(s: &str) -> Token {
        Token::with_value(TokenKind::String, s.to_string())
    }

    #[test]
    fn test_tolkien() -> Result<(), ParseError> {
        let seq = lex_all("@book{tolkien1937, author = {J. R. R. Tolkien}}")?;
        assert_eq!(
            seq,
            vec![
                Token::bare(TokenKind::Start),
                name("book"),
                Token::bare(TokenKind::LeftBrace),
                name("tolkien1937"),
                Token::bare(TokenKind::Comma),
                name("author"),
                Token::bare(TokenKind::Equal),
                string("J. R. R. Tolkien"),
                Token::bare(TokenKind::RightBrace),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_nested_braces_are_kept() -> Result<(), ParseError> {
        let seq = lex_all(r#"@a{k, title = {"0"{123}456{789}}}"#)?;
        assert_eq!(seq[7], string(r#""0"{123}456{789}"#));
        assert_eq!(seq[8], Token::bare(TokenKind::RightBrace));
        assert_eq!(seq.len(), 9);
        Ok(())
    }

    #[test]
    fn test_quoted_escapes_are_verbatim() -> Result<(), ParseError> {
        let seq = lex_all(r#""hello \"world\"" # 2012"#)?;
        assert_eq!(
            seq,
            vec![
                string(r#"hello \"world\""#),
                Token::bare(TokenKind::Concatenation),
                Token::with_value(TokenKind::Number, "2012".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_escaped_backslash_ends_quoted_string() -> Result<(), ParseError> {
        let seq = lex_all(r#""C:\\" # "a\\\"b""#)?;
        assert_eq!(
            seq,
            vec![
                string(r#"C:\\"#),
                Token::bare(TokenKind::Concatenation),
                string(r#"a\\\"b"#),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_location_points_past_consumed_characters() {
        let mut lexer = Lexer::new("@book\n  {", &DEFAULT_MARKERS);
        assert_eq!(lexer.location(), Position { line: 1, column: 1 });
        lexer.next();
        lexer.next();
        assert_eq!(lexer.location(), Position { line: 1, column: 6 });
        lexer.next();
        assert_eq!(lexer.location(), Position { line: 2, column: 4 });
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_name_stops_at_other_characters() -> Result<(), ParseError> {
        let seq = lex_all("DBLP:books/aw_K-n.73a=")?;
        assert_eq!(seq, vec![name("DBLP:books/aw_K-n.73a"), Token::bare(TokenKind::Equal)]);
        Ok(())
    }

    #[test]
    fn test_digits_then_letters_split() -> Result<(), ParseError> {
        let seq = lex_all("797abc")?;
        assert_eq!(
            seq,
            vec![Token::with_value(TokenKind::Number, "797".to_string()), name("abc")]
        );
        Ok(())
    }

    #[test]
    fn test_comment_runs_to_end_of_line() -> Result<(), ParseError> {
        let seq = lex_all("% @ignored {\n@book")?;
        assert_eq!(seq, vec![Token::bare(TokenKind::Start), name("book")]);
        Ok(())
    }

    #[test]
    fn test_custom_comment_marker() {
        let markers = ['!'];
        let kinds: Vec<TokenKind> = Lexer::new("! % comment\n@", &markers)
            .map(|item| item.map(|(token, _)| token.kind))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(kinds, vec![TokenKind::Start]);

        let err = Lexer::new("% no comment", &markers).next().unwrap().unwrap_err();
        assert_eq!(err, ParseError::unrecognizable(Position { line: 1, column: 1 }, '%'));
    }

    #[test]
    fn test_positions() -> Result<(), ParseError> {
        let positions: Vec<Position> = Lexer::new("@book{\n  key,\n\ttitle}", &DEFAULT_MARKERS)
            .map(|item| item.map(|(_, pos)| pos))
            .collect::<Result<_, _>>()?;
        let expected = [(1, 1), (1, 2), (1, 6), (2, 3), (2, 6), (3, 2), (3, 7)];
        let expected: Vec<Position> = expected
            .iter()
            .map(|&(line, column)| Position { line, column })
            .collect();
        assert_eq!(positions, expected);
        Ok(())
    }

    #[test]
    fn test_unrecognizable_character_fuses() {
        let mut lexer = Lexer::new("@book{,ti?le = {Hadoop}}", &DEFAULT_MARKERS);
        let err = lexer.find_map(Result::err).unwrap();
        assert_eq!(err, ParseError::unrecognizable(Position { line: 1, column: 10 }, '?'));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_unterminated_braced_value() -> Result<(), ParseError> {
        let seq = lex_all("@a{k, t = {open {inner} text")?;
        assert_eq!(seq.last(), Some(&string("open {inner} text")));
        Ok(())
    }
}
