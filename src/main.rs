//! Purpose: `modeljson` CLI entry point.
//! Role: Binary crate root; parses args, decodes one JSON document, runs one typed extraction.
//! Invariants: Successful commands emit exactly one JSON value on stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::fs::File;
use std::io::{self, BufReader, IsTerminal, Write};
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;
mod json;

use modeljson::api::{
    Error, ErrorKind, FromJson, JsonMappingExt, format_rfc3339_utc, json_type_name,
    parse_iso8601, to_exit_code,
};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Run `modeljson --help` for usage."));
            }
        },
    };

    let input = InputSource::from_flags(cli.file, cli.json);
    command_dispatch::dispatch_command(cli.command, input, cli.pretty)
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or("invalid arguments");
    first.trim_start_matches("error:").trim().to_string()
}

#[derive(Parser)]
#[command(
    name = "modeljson",
    version,
    about = "Typed field extraction from JSON documents",
    long_about = None,
    after_help = r#"EXAMPLES
  $ echo '{"age": 36}' | modeljson get age --as int
  {"key":"age","value":36}
  $ modeljson --file user.json get joined --as date --default 1970-01-01T00:00:00Z
  $ modeljson --json '{"tags":["a","b"]}' list tags --as string
  $ modeljson --file user.json require name --as string
  $ modeljson --file user.json keys"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        help = "Read the document from a file (default: stdin)",
        value_hint = ValueHint::FilePath,
        conflicts_with = "json"
    )]
    file: Option<PathBuf>,
    #[arg(long, help = "Read the document from an inline JSON argument")]
    json: Option<String>,
    #[arg(long, help = "Pretty-print the JSON output")]
    pretty: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Extract one field, falling back to a default on mismatch")]
    Get {
        #[arg(help = "Top-level key to read")]
        key: String,
        #[arg(long = "as", value_enum, default_value = "value", help = "Target type")]
        kind: FieldType,
        #[arg(
            long,
            help = "Fallback value; parsed as JSON, or taken as a string if it is not JSON"
        )]
        default: Option<String>,
    },
    #[command(about = "Extract a list field; null unless every element has the target type")]
    List {
        #[arg(help = "Top-level key to read")]
        key: String,
        #[arg(long = "as", value_enum, default_value = "value", help = "Element type")]
        kind: FieldType,
    },
    #[command(about = "Extract one field, failing on a missing key or a type mismatch")]
    Require {
        #[arg(help = "Top-level key to read")]
        key: String,
        #[arg(long = "as", value_enum, default_value = "value", help = "Target type")]
        kind: FieldType,
    },
    #[command(about = "List top-level keys with their JSON types")]
    Keys,
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completions",
        after_help = r#"EXAMPLES
  $ modeljson completion bash > ~/.local/share/bash-completion/completions/modeljson
  $ modeljson completion zsh > ~/.zfunc/_modeljson"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum FieldType {
    String,
    Bool,
    Int,
    Float,
    Double,
    Date,
    Value,
    Mapping,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(PathBuf),
    Inline(String),
}

impl InputSource {
    fn from_flags(file: Option<PathBuf>, json: Option<String>) -> Self {
        match (file, json) {
            (Some(path), _) => InputSource::File(path),
            (None, Some(text)) => InputSource::Inline(text),
            (None, None) => InputSource::Stdin,
        }
    }

    fn context(&self) -> String {
        match self {
            InputSource::Stdin => "stdin".to_string(),
            InputSource::File(path) => path.display().to_string(),
            InputSource::Inline(_) => "--json".to_string(),
        }
    }

    /// Decodes the document; only top-level objects are accepted.
    fn load(&self) -> Result<Value, Error> {
        let decoded: Result<Value, serde_json::Error> = match self {
            InputSource::Stdin => json::parse::from_reader(io::stdin().lock()),
            InputSource::File(path) => {
                let file = File::open(path).map_err(|err| {
                    Error::new(ErrorKind::Io)
                        .with_message(format!("failed to open {}", path.display()))
                        .with_hint("Check the --file path and its permissions.")
                        .with_source(err)
                })?;
                json::parse::from_reader(BufReader::new(file))
            }
            InputSource::Inline(text) => json::parse::from_str(text),
        };
        let value = decoded.map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("input is not valid JSON")
                .with_hint(json::parse::hint_for_error(&err, &self.context()))
                .with_source(err)
        })?;
        if !value.is_object() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message(format!(
                    "top-level JSON document must be an object, found {}",
                    json_type_name(&value)
                ))
                .with_hint("Extraction reads keys from a JSON object."));
        }
        tracing::debug!(source = %self.context(), "decoded input document");
        Ok(value)
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn emit_json(value: Value, pretty: bool) -> Result<(), Error> {
    write_json(&mut io::stdout().lock(), &value, pretty)
}

fn write_json(out: &mut impl Write, value: &Value, pretty: bool) -> Result<(), Error> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("json encode failed")
            .with_source(err)
    })?;
    writeln!(out, "{rendered}").map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write output")
            .with_source(err)
    })
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("error: {}", error_message(err));
        if let Some(hint) = err.hint() {
            eprintln!("hint: {hint}");
        }
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::MissingKey => "key not present".to_string(),
        ErrorKind::TypeMismatch => "type mismatch".to_string(),
        ErrorKind::DateParse => "invalid date".to_string(),
        ErrorKind::Construction => "model construction failed".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(key) = err.key() {
        inner.insert("key".to_string(), json!(key));
    }
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}
