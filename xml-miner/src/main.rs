//! xml-miner - select field values from XML and TRXML documents
//!
//! This is the main CLI entry point: it builds the selector set, resolves
//! the document source and writes the selected rows.

mod cli;

use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use xml_miner_core::{
    DocumentKind, DocumentSource, OutputFormat, RecordSink, SelectorSet, ServerQuery, TracingReporter, TrxmlMiner,
    XmlMiner,
};

use cli::{Args, Command, TrxmlArgs, XmlArgs};

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing(args.quiet, args.verbose) {
        eprintln!("error: {:#}", e);
        return ExitCode::FAILURE;
    }

    if let Err(e) = run(args.command) {
        eprintln!("error: {:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("XML_MINER_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Xml(args) => run_xml(args),
        Command::Trxml(args) => run_trxml(args),
    }
}

fn run_xml(args: XmlArgs) -> anyhow::Result<()> {
    let selectors = SelectorSet::from_selector_string(&args.selector)
        .with_context(|| format!("invalid selector '{}'", args.selector))?;
    let miner = XmlMiner::new(selectors, args.with_field_name)?;

    let query = ServerQuery {
        query: args.query,
        user: args.as_user,
        password: args.as_pass,
    };
    let source = DocumentSource::resolve(&args.source, DocumentKind::Xml, &query)?;

    info!("select '{}' and write results to '{}'", miner.selectors(), args.output_file);
    let mut sink = open_sink(&args.output_file, args.format.as_deref())?;
    miner.mine_and_save(source, &mut sink, &mut TracingReporter)?;
    sink.finish()?;

    Ok(())
}

fn run_trxml(args: TrxmlArgs) -> anyhow::Result<()> {
    let selectors = match (&args.selector, &args.itemgroup, &args.fields) {
        (Some(selector), _, _) => SelectorSet::from_selector_string(selector)
            .with_context(|| format!("invalid selector '{}'", selector))?,
        (None, Some(itemgroup), Some(fields)) => SelectorSet::from_itemgroup_and_fields(itemgroup, fields)
            .with_context(|| format!("invalid item group '{}' or fields '{}'", itemgroup, fields))?,
        _ => bail!("need to set --selector, or both --itemgroup and --fields"),
    };
    let miner = TrxmlMiner::new(selectors)?;

    let source = DocumentSource::resolve(&args.source, DocumentKind::Trxml, &ServerQuery::default())?;

    info!("select '{}' and write results to '{}'", miner.selectors(), args.output_file);
    let mut sink = open_sink(&args.output_file, args.format.as_deref())?;
    miner.mine_and_save(source, &mut sink, &mut TracingReporter)?;
    sink.finish()?;

    Ok(())
}

fn open_sink(target: &str, format: Option<&str>) -> anyhow::Result<RecordSink> {
    let format = format.map(output_format).transpose()?;
    let sink = RecordSink::open(target)?;
    Ok(match format {
        Some(format) => sink.with_format(format),
        None => sink,
    })
}

fn output_format(name: &str) -> anyhow::Result<OutputFormat> {
    OutputFormat::from_str(name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown format '{}', expected one of: {}",
            name,
            OutputFormat::valid_formats().join(", ")
        )
    })
}
