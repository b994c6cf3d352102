use std::error;
use std::io;
use std::process;

use bibstream::{BibEntry, ParseError, Parser, ParserConfig, Writer, WriterConfig};

use clap::Parser as CLIParser;

#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Settings {
    /// Filepath to file to parse
    #[clap(short, long)]
    input: String,

    /// Return only entries with this key
    #[clap(short, long)]
    query_key: Option<String>,

    /// Character starting a comment line (repeatable, default '%')
    #[clap(short, long = "comment-marker")]
    comment_markers: Vec<char>,

    /// Write the entries back as BibTeχ instead of listing them
    #[clap(short, long)]
    rewrite: bool,

    /// Align field values when rewriting
    #[clap(long)]
    align: bool,

    /// Indentation of fields when rewriting
    #[clap(long, default_value = "    ")]
    indent: String,

    /// Print the entries as JSON
    #[cfg(feature = "serde_json")]
    #[clap(long)]
    json: bool,
}

impl Settings {
    fn parser_config(&self) -> ParserConfig {
        if self.comment_markers.is_empty() {
            ParserConfig::default()
        } else {
            ParserConfig {
                comment_markers: self.comment_markers.clone(),
            }
        }
    }

    fn writer_config(&self) -> WriterConfig {
        WriterConfig {
            align: self.align,
            indent: self.indent.clone(),
            ..WriterConfig::default()
        }
    }
}

/// Read all entries matching the query. Entries before a parse error are
/// returned together with the error.
fn read_entries(s: &Settings) -> Result<(Vec<BibEntry>, Option<ParseError>), io::Error> {
    let p = Parser::from_file(&s.input)?.with_config(s.parser_config());
    let mut entries = Vec::new();
    for result in p.iter() {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => return Ok((entries, Some(e))),
        };
        if let Some(query) = &s.query_key {
            if query != &entry.key {
                continue;
            }
        }
        entries.push(entry);
    }
    Ok((entries, None))
}

fn print_human_readable(entries: &[BibEntry]) {
    for entry in entries {
        println!("type = {}", entry.kind);
        println!("key = {}", entry.key);
        for (name, data) in entry.fields() {
            println!("\t{}\t= {}", name, data);
        }
    }
}

fn print_bibtex(s: &Settings, entries: &[BibEntry]) -> Result<(), io::Error> {
    let stdout = io::stdout();
    let mut writer = Writer::with_config(stdout.lock(), s.writer_config());
    writer.write_entries(entries)
}

#[cfg(feature = "serde_json")]
fn print_json(entries: &[BibEntry]) -> Result<(), Box<dyn error::Error>> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Entries<'e> {
        data: &'e [BibEntry],
    }

    println!("{}", serde_json::to_string(&Entries { data: entries })?);
    Ok(())
}

fn main() -> Result<(), Box<dyn error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let settings = Settings::parse();
    let (entries, failure) = read_entries(&settings)?;

    #[cfg(feature = "serde_json")]
    let json = settings.json;
    #[cfg(not(feature = "serde_json"))]
    let json = false;

    if json {
        #[cfg(feature = "serde_json")]
        print_json(&entries)?;
    } else if settings.rewrite {
        print_bibtex(&settings, &entries)?;
    } else {
        print_human_readable(&entries);
    }

    if let Some(e) = failure {
        eprintln!("{}: {}", settings.input, e);
        process::exit(1);
    }
    Ok(())
}
