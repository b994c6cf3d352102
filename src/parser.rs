use std::fs;
use std::io;
use std::io::Read;
use std::mem;
use std::path;
use std::str;

use log::{debug, trace, warn};
use strum::IntoEnumIterator;

use crate::config::ParserConfig;
use crate::errors::ParseError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::types::BibEntry;

/// Parser parsing a `.bib` file allowing iteration over `BibEntry` instances
pub struct Parser {
    src: String,
    config: ParserConfig,
}

impl Parser {
    /// Use a file at some filepath as source for the parsing process.
    pub fn from_file<P: AsRef<path::Path>>(path: P) -> Result<Parser, io::Error> {
        let fd = fs::File::open(path)?;
        Self::from_reader(fd)
    }

    /// Read the entire `reader` and use its content as source for the parsing process.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Parser, io::Error> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Ok(Self::from_string(buf))
    }

    /// Use a string as source for the parsing process.
    pub fn from_string(data: String) -> Parser {
        Parser {
            src: data,
            config: ParserConfig::default(),
        }
    }

    /// Replace the default configuration
    pub fn with_config(mut self, config: ParserConfig) -> Parser {
        self.config = config;
        self
    }

    /// Start a fresh pass over the source, yielding entries on demand
    pub fn iter(&self) -> BibEntries<'_> {
        BibEntries {
            lexer: Lexer::new(&self.src, &self.config.comment_markers),
            state: State::Begin,
            current: None,
            tag_name: String::new(),
            tag_value: String::new(),
            finished: false,
        }
    }
}

impl str::FromStr for Parser {
    type Err = io::Error;

    /// Use a string as source for the parsing process.
    fn from_str(data: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_string(data.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Begin,
    AfterStart,
    InEntryHeader,
    InKey,
    /// exactly one Name read in key position, which may still turn out to be a tag name
    AfterKeyName,
    AfterKey,
    InTagName,
    AfterTagName,
    InTagValue,
    AfterTagValue,
    AfterEntry,
}

impl State {
    /// The source may end in this state
    fn is_between_entries(self) -> bool {
        matches!(self, State::Begin | State::AfterEntry)
    }
}

/// Modification of the entry under construction attached to a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Create,
    SetType,
    SetKey,
    /// the single key name turned out to be the name of a tag: `@misc{title = …}`
    KeyAsTagName,
    SetTagName,
    SetTagValue,
    SetTag,
    Build,
    Skip,
}

/// The transition table of the parser
fn transition(state: State, kind: TokenKind) -> Option<(State, Action)> {
    use Action as A;
    use State as S;
    use TokenKind as T;

    let next = match (state, kind) {
        (S::Begin | S::AfterEntry, T::Start) => (S::AfterStart, A::Create),
        (S::AfterStart, T::Name) => (S::InEntryHeader, A::SetType),
        (S::InEntryHeader, T::LeftBrace) => (S::InKey, A::Skip),
        (S::InKey, T::Name) => (S::AfterKeyName, A::SetKey),
        (S::InKey | S::AfterKeyName | S::AfterKey, T::Number) => (S::AfterKey, A::SetKey),
        (S::AfterKeyName | S::AfterKey, T::Name) => (S::AfterKey, A::SetKey),
        (S::InKey | S::AfterKeyName | S::AfterKey, T::Comma) => (S::InTagName, A::Skip),
        (S::InKey | S::AfterKeyName | S::AfterKey, T::RightBrace) => (S::AfterEntry, A::Build),
        (S::AfterKeyName, T::Equal) => (S::InTagValue, A::KeyAsTagName),
        (S::InTagName, T::Name) => (S::AfterTagName, A::SetTagName),
        (S::InTagName, T::RightBrace) => (S::AfterEntry, A::Build),
        (S::AfterTagName, T::Equal) => (S::InTagValue, A::Skip),
        (S::InTagValue, T::String | T::Name | T::Number) => (S::AfterTagValue, A::SetTagValue),
        (S::AfterTagValue, T::Concatenation) => (S::InTagValue, A::Skip),
        (S::AfterTagValue, T::Comma) => (S::InTagName, A::SetTag),
        (S::AfterTagValue, T::RightBrace) => (S::AfterEntry, A::Build),
        _ => return None,
    };
    Some(next)
}

/// All token kinds `state` has a transition for
fn expected_kinds(state: State) -> Vec<TokenKind> {
    TokenKind::iter()
        .filter(|&kind| transition(state, kind).is_some())
        .collect()
}

/// A stateful iterator yielding one BibEntry instance after another
pub struct BibEntries<'i> {
    lexer: Lexer<'i>,
    state: State,
    current: Option<BibEntry>,
    tag_name: String,
    tag_value: String,
    finished: bool,
}

impl<'i> BibEntries<'i> {
    /// Store the pending tag in the current entry
    fn commit_tag(&mut self) {
        let name = mem::take(&mut self.tag_name);
        let value = mem::take(&mut self.tag_value);
        if name.is_empty() {
            return;
        }
        let entry = self.current.get_or_insert_with(BibEntry::new);
        if entry.has_field(&name) {
            warn!("duplicate field '{}' in entry '{}', keeping the last value", name, entry.key);
        }
        entry.set(&name, value);
    }

    /// Apply `action` to the entry under construction.
    /// Returns the entry if it got completed.
    fn apply(&mut self, action: Action, token: Token) -> Option<BibEntry> {
        let value = token.value.unwrap_or_default();
        match action {
            Action::Create => {
                self.current = Some(BibEntry::new());
                self.tag_name.clear();
                self.tag_value.clear();
            }
            Action::SetType => self.current.get_or_insert_with(BibEntry::new).kind = value,
            Action::SetKey => self.current.get_or_insert_with(BibEntry::new).key.push_str(&value),
            Action::KeyAsTagName => {
                let entry = self.current.get_or_insert_with(BibEntry::new);
                self.tag_name = mem::take(&mut entry.key);
            }
            Action::SetTagName => self.tag_name = value,
            Action::SetTagValue => self.tag_value.push_str(&value),
            Action::SetTag => self.commit_tag(),
            Action::Build => {
                self.commit_tag();
                let entry = self.current.take().unwrap_or_default();
                debug!("parsed entry '{}' of type '{}' with {} fields", entry.key, entry.kind, entry.len());
                return Some(entry);
            }
            Action::Skip => {}
        }
        None
    }

    /// parse() continues parsing until an entry is completed, the source ends or an error occurs
    fn parse(&mut self) -> Option<Result<BibEntry, ParseError>> {
        while let Some(item) = self.lexer.next() {
            let (token, pos) = match item {
                Ok(t) => t,
                Err(e) => return Some(Err(e)),
            };
            let (next, action) = match transition(self.state, token.kind) {
                Some(t) => t,
                None => {
                    return Some(Err(ParseError::unexpected(
                        pos,
                        token.kind,
                        expected_kinds(self.state),
                    )))
                }
            };
            trace!("{:?} --{}--> {:?} ({:?})", self.state, token.kind, next, action);
            self.state = next;
            if let Some(entry) = self.apply(action, token) {
                return Some(Ok(entry));
            }
        }

        if self.state.is_between_entries() {
            return None;
        }
        Some(Err(ParseError::unexpected(
            self.lexer.location(),
            TokenKind::EndOfInput,
            expected_kinds(self.state),
        )))
    }
}

impl<'s> Iterator for BibEntries<'s> {
    type Item = Result<BibEntry, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.parse();
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}
