/// Settings of the [`Parser`](crate::Parser)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserConfig {
    /// Characters starting a comment which runs until the end of the line
    pub comment_markers: Vec<char>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            comment_markers: vec!['%'],
        }
    }
}

/// Settings of the [`Writer`](crate::Writer)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WriterConfig {
    /// Pad field names to the longest name of the entry, so the values line up
    pub align: bool,
    /// Prefix of every field line
    pub indent: String,
    /// Line terminator
    pub newline: String,
    /// Insert an empty line between two entries
    pub blank_line_between_entries: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            align: false,
            indent: "    ".to_string(),
            newline: "\n".to_string(),
            blank_line_between_entries: true,
        }
    }
}
