//! CLI argument parsing using clap

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Select field values from XML and TRXML documents
#[derive(Parser, Debug)]
#[command(name = "xml-miner")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Every <name> and <skill> in a directory of xml files, as tab-delimited rows
    xml-miner xml --source docs/ --selector name,skill --output-file out/values.csv --with-field-name

    # Documents listed by an annotation server
    xml-miner xml --source localhost:6666 --query "status=done" --selector name

    # One value per selector per document
    xml-miner trxml --source docs.mtrxml --selector personal.name,education.0.degree

    # One row per item of an item group
    xml-miner trxml --source docs/ --itemgroup experienceitem --fields experience,experiencedate
"#)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Show debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select tag values from flat xml documents
    Xml(XmlArgs),
    /// Select item fields from trxml documents
    Trxml(TrxmlArgs),
}

#[derive(ClapArgs, Debug)]
pub struct XmlArgs {
    /// Directory, multi-document file, or annotation server host:port
    #[arg(short = 's', long = "source")]
    pub source: String,

    /// Comma-separated tag names
    #[arg(long = "selector")]
    pub selector: String,

    /// Output file; .csv/.tsv are tab-delimited, .jsonl is JSON lines
    #[arg(short = 'o', long = "output-file", default_value = "STDOUT")]
    pub output_file: String,

    /// Output format (csv, tsv, jsonl, txt), overriding the output file extension
    #[arg(long = "format")]
    pub format: Option<String>,

    /// Add the selector as a third column
    #[arg(long = "with-field-name")]
    pub with_field_name: bool,

    /// Query sent to the annotation server
    #[arg(long = "query", default_value = "")]
    pub query: String,

    /// Annotation server user
    #[arg(long = "as-user", env = "XML_MINER_AS_USER", default_value = "")]
    pub as_user: String,

    /// Annotation server password
    #[arg(long = "as-pass", env = "XML_MINER_AS_PASS", default_value = "", hide_env_values = true)]
    pub as_pass: String,
}

#[derive(ClapArgs, Debug)]
pub struct TrxmlArgs {
    /// Directory or multi-document file
    #[arg(short = 's', long = "source")]
    pub source: String,

    /// Comma-separated itemized selectors (itemgroup.field, itemgroup.0.field, ...)
    #[arg(long = "selector", conflicts_with_all = ["itemgroup", "fields"])]
    pub selector: Option<String>,

    /// Item group to read every item of, together with --fields
    #[arg(long = "itemgroup", requires = "fields")]
    pub itemgroup: Option<String>,

    /// Comma-separated field names, together with --itemgroup
    #[arg(long = "fields", requires = "itemgroup")]
    pub fields: Option<String>,

    /// Output file; .csv/.tsv are tab-delimited, .jsonl is JSON lines
    #[arg(short = 'o', long = "output-file", default_value = "STDOUT")]
    pub output_file: String,

    /// Output format (csv, tsv, jsonl, txt), overriding the output file extension
    #[arg(long = "format")]
    pub format: Option<String>,
}
