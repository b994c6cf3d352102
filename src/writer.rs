use std::io;

use crate::config::WriterConfig;
use crate::types::BibEntry;

/// Writes `BibEntry` instances as BibTeχ source to some `io::Write` sink.
///
/// Every field is written as `name = {data}`. Fields with an empty or
/// whitespace-only name or data are skipped.
pub struct Writer<W: io::Write> {
    sink: W,
    config: WriterConfig,
    first: bool,
}

impl<W: io::Write> Writer<W> {
    /// Writer with the default configuration
    pub fn new(sink: W) -> Writer<W> {
        Self::with_config(sink, WriterConfig::default())
    }

    /// Writer with a custom configuration
    pub fn with_config(sink: W, config: WriterConfig) -> Writer<W> {
        Writer {
            sink,
            config,
            first: true,
        }
    }

    /// Write one entry, followed by a line terminator
    pub fn write_entry(&mut self, entry: &BibEntry) -> io::Result<()> {
        let mut out = String::new();
        if !self.first && self.config.blank_line_between_entries {
            out.push_str(&self.config.newline);
        }
        render_entry(&mut out, entry, &self.config);
        out.push_str(&self.config.newline);
        self.sink.write_all(out.as_bytes())?;
        self.first = false;
        Ok(())
    }

    /// Write all `entries` and flush the sink
    pub fn write_entries<'e, I>(&mut self, entries: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'e BibEntry>,
    {
        for entry in entries {
            self.write_entry(entry)?;
        }
        self.sink.flush()
    }

    /// Give back the sink
    pub fn into_inner(self) -> W {
        self.sink
    }
}

fn is_printable(name: &str, data: &str) -> bool {
    !name.trim().is_empty() && !data.trim().is_empty()
}

fn render_entry(out: &mut String, entry: &BibEntry, config: &WriterConfig) {
    out.push('@');
    out.push_str(&entry.kind);
    out.push('{');
    out.push_str(&entry.key);

    let fields: Vec<(&str, &str)> = entry
        .fields()
        .filter(|(name, data)| is_printable(name, data))
        .collect();
    if !fields.is_empty() {
        out.push(',');
        out.push_str(&config.newline);

        let pad = if config.align {
            fields.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0)
        } else {
            0
        };
        for (i, (name, data)) in fields.iter().enumerate() {
            out.push_str(&config.indent);
            out.push_str(&format!("{:<pad$}", name, pad = pad));
            out.push_str(" = {");
            out.push_str(data);
            out.push('}');
            if i + 1 < fields.len() {
                out.push(',');
            }
            out.push_str(&config.newline);
        }
    }
    out.push('}');
}

/// Render `entries` as one string, the way a [`Writer`] with `config` would write them.
pub fn to_bibtex_string<'e, I>(entries: I, config: &WriterConfig) -> String
where
    I: IntoIterator<Item = &'e BibEntry>,
{
    let mut out = String::new();
    for (i, entry) in entries.into_iter().enumerate() {
        if i > 0 && config.blank_line_between_entries {
            out.push_str(&config.newline);
        }
        render_entry(&mut out, entry, config);
        out.push_str(&config.newline);
    }
    out
}
