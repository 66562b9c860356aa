use mindgraft::{
    MindgraftConfig, OutputFormat, Pipeline, PipelineError, ProcessOptions, ProcessOutput,
    prune_forest,
};
use serde::Serialize;
use serde_json::Value;
use std::io::{Read, Write};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Mindgraft(mindgraft::Error),
    Pipeline(PipelineError),
    Json(serde_json::Error),
    NoTree,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Mindgraft(err) => write!(f, "{err}"),
            CliError::Pipeline(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NoTree => write!(
                f,
                "No mind map produced: the first topic needs at least one valid subtopic"
            ),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<mindgraft::Error> for CliError {
    fn from(value: mindgraft::Error) -> Self {
        Self::Mindgraft(value)
    }
}

impl From<PipelineError> for CliError {
    fn from(value: PipelineError) -> Self {
        Self::Pipeline(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    Build,
    Flowchart,
    Json,
    MindMap,
    #[default]
    All,
}

impl Command {
    fn output_format(self) -> OutputFormat {
        match self {
            Command::Build | Command::Flowchart => OutputFormat::Flowchart,
            Command::Json => OutputFormat::Json,
            Command::MindMap => OutputFormat::MindMap,
            Command::All => OutputFormat::All,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    topics: bool,
    language: Option<String>,
    config: Option<String>,
    pretty: bool,
    layout: bool,
    verbose: bool,
}

fn usage() -> &'static str {
    "mindgraft-cli\n\
\n\
USAGE:\n\
  mindgraft-cli [all] [--topics] [--language <code>] [--config <path>] [--pretty] [--layout] [<path>|-]\n\
  mindgraft-cli build [--topics] [--config <path>] [--pretty] [--layout] [<path>|-]\n\
  mindgraft-cli flowchart [--topics] [--config <path>] [--layout] [<path>|-]\n\
  mindgraft-cli json [--topics] [--language <code>] [--config <path>] [--pretty] [<path>|-]\n\
  mindgraft-cli mindmap [--topics] [--language <code>] [--config <path>] [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is free text unless --topics is given, in which case it is a JSON array of topics.\n\
  - build prints the topic graph; all prints every artifact in one JSON document.\n\
  - --config accepts JSON, JSON5 or YAML; unspecified keys keep their defaults.\n\
  - Diagnostics go to stderr; set MINDGRAFT_LOG (e.g. MINDGRAFT_LOG=debug) to change the level.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "all" => args.command = Command::All,
            "build" => args.command = Command::Build,
            "flowchart" => args.command = Command::Flowchart,
            "json" => args.command = Command::Json,
            "mindmap" => args.command = Command::MindMap,
            "--topics" => args.topics = true,
            "--pretty" => args.pretty = true,
            "--layout" => args.layout = true,
            "--verbose" | "-v" => args.verbose = true,
            "--language" => {
                let Some(lang) = it.next().filter(|l| !l.trim().is_empty()) else {
                    return Err(CliError::Usage(usage()));
                };
                args.language = Some(lang.trim().to_string());
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            other if other.starts_with("--") => return Err(CliError::Usage(usage())),
            other => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(other.to_string());
            }
        }
    }

    Ok(args)
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("MINDGRAFT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn load_config(path: Option<&str>) -> Result<MindgraftConfig, CliError> {
    match path {
        Some(path) => Ok(MindgraftConfig::parse_with_defaults(&std::fs::read_to_string(
            path,
        )?)?),
        None => Ok(MindgraftConfig::defaults()),
    }
}

fn process(args: &Args, config: &MindgraftConfig, input: &str) -> Result<ProcessOutput, CliError> {
    let pipeline = Pipeline::from_config(config);
    let mut options = ProcessOptions::from_config(config);
    if let Some(lang) = &args.language {
        options.language = lang.clone();
    }
    options.optimize_layout = args.layout;
    options.output_format = args.command.output_format();

    if !args.topics {
        return Ok(pipeline.process_content(input, &options)?);
    }
    let value: Value = serde_json::from_str(input)?;
    if value.as_array().is_some_and(Vec::is_empty) {
        return Err(mindgraft::Error::EmptyForest.into());
    }
    let topics = prune_forest(&value)?;
    Ok(pipeline.process_topics(topics, &options)?)
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let output = process(&args, &config, &input)?;
    tracing::info!(
        topics = output.topics.len(),
        nodes = output.graph.nodes.len(),
        "processed input"
    );

    match args.command {
        Command::Build => write_json(&output.graph, args.pretty),
        Command::Flowchart => {
            let text = output.flowchart.unwrap_or_default();
            let mut out = std::io::stdout().lock();
            out.write_all(text.as_bytes())?;
            Ok(())
        }
        Command::Json => write_json(&output.json_tree.ok_or(CliError::NoTree)?, args.pretty),
        Command::MindMap => write_json(&output.mind_map.ok_or(CliError::NoTree)?, args.pretty),
        Command::All => {
            let text = output.to_json(args.pretty)?;
            let mut out = std::io::stdout().lock();
            writeln!(out, "{text}")?;
            Ok(())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => {}
        Err(CliError::NoTree) => {
            eprintln!("{}", CliError::NoTree);
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
