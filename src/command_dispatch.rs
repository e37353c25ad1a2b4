//! Purpose: Hold top-level CLI command dispatch for `modeljson`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate extraction to the library.
//! Invariants: Output envelope is `{"key": .., "value": ..}` for get/list/require.
//! Invariants: Absent values render as JSON `null`; dates render as RFC 3339 UTC.

use super::*;

pub(super) fn dispatch_command(
    command: Command,
    input: InputSource,
    pretty: bool,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "modeljson", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Get { key, kind, default } => {
            let doc = input.load()?;
            let default = default.as_deref().map(default_value);
            let value = lenient_field(&doc, &key, kind, default.as_ref())?;
            emit_json(json!({ "key": key, "value": value }), pretty)?;
            Ok(RunOutcome::ok())
        }
        Command::List { key, kind } => {
            let doc = input.load()?;
            let value = list_field(&doc, &key, kind)?;
            emit_json(json!({ "key": key, "value": value }), pretty)?;
            Ok(RunOutcome::ok())
        }
        Command::Require { key, kind } => {
            let doc = input.load()?;
            let value = strict_field(&doc, &key, kind)?;
            emit_json(json!({ "key": key, "value": value }), pretty)?;
            Ok(RunOutcome::ok())
        }
        Command::Keys => {
            let doc = input.load()?;
            let keys = doc
                .as_object()
                .map(|mapping| {
                    mapping
                        .iter()
                        .map(|(key, value)| json!({ "key": key, "type": json_type_name(value) }))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            emit_json(json!({ "keys": keys }), pretty)?;
            Ok(RunOutcome::ok())
        }
    }
}

/// `--default` text as JSON when it parses, otherwise as a bare string.
fn default_value(text: &str) -> Value {
    json::parse::from_str::<Value>(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn lenient_field(
    doc: &Value,
    key: &str,
    kind: FieldType,
    default: Option<&Value>,
) -> Result<Value, Error> {
    match kind {
        FieldType::String => lenient::<String>(doc, key, kind, default, Value::from),
        FieldType::Bool => lenient::<bool>(doc, key, kind, default, Value::from),
        FieldType::Int => lenient::<i64>(doc, key, kind, default, Value::from),
        FieldType::Float => lenient::<f32>(doc, key, kind, default, render_f32),
        FieldType::Double => lenient::<f64>(doc, key, kind, default, Value::from),
        FieldType::Value => lenient::<Value>(doc, key, kind, default, Value::from),
        FieldType::Mapping => lenient::<Map<String, Value>>(doc, key, kind, default, Value::Object),
        FieldType::Date => {
            let default = default.map(date_default).transpose()?;
            doc.date_for_key(key, default)
                .map(render_date)
                .transpose()
                .map(Option::unwrap_or_default)
        }
    }
}

fn lenient<T: FromJson>(
    doc: &Value,
    key: &str,
    kind: FieldType,
    default: Option<&Value>,
    render: fn(T) -> Value,
) -> Result<Value, Error> {
    let default = default
        .map(|value| {
            T::from_json(value).ok_or_else(|| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!(
                        "--default {value} is not a valid {}",
                        kind_label(kind)
                    ))
                    .with_hint("Pass a default whose JSON type matches --as.")
            })
        })
        .transpose()?;
    Ok(doc
        .value_for_key::<T>(key, default)
        .map(render)
        .unwrap_or_default())
}

fn list_field(doc: &Value, key: &str, kind: FieldType) -> Result<Value, Error> {
    let value = match kind {
        FieldType::String => doc.array_for_key::<String>(key).map(Value::from),
        FieldType::Bool => doc.array_for_key::<bool>(key).map(Value::from),
        FieldType::Int => doc.array_for_key::<i64>(key).map(Value::from),
        FieldType::Float => doc
            .array_for_key::<f32>(key)
            .map(|items| Value::Array(items.into_iter().map(render_f32).collect())),
        FieldType::Double => doc.array_for_key::<f64>(key).map(Value::from),
        FieldType::Value => doc.array_for_key::<Value>(key).map(Value::from),
        FieldType::Mapping => doc
            .array_for_key::<Map<String, Value>>(key)
            .map(|items| Value::Array(items.into_iter().map(Value::Object).collect())),
        FieldType::Date => match doc.array_for_key::<String>(key) {
            Some(items) => {
                let mut dates = Vec::with_capacity(items.len());
                for item in &items {
                    match parse_iso8601(item) {
                        Ok(date) => dates.push(render_date(date)?),
                        Err(_) => return Ok(Value::Null),
                    }
                }
                Some(Value::Array(dates))
            }
            None => None,
        },
    };
    Ok(value.unwrap_or_default())
}

fn strict_field(doc: &Value, key: &str, kind: FieldType) -> Result<Value, Error> {
    let value = match kind {
        FieldType::String => Value::from(doc.require::<String>(key)?),
        FieldType::Bool => Value::from(doc.require::<bool>(key)?),
        FieldType::Int => Value::from(doc.require::<i64>(key)?),
        FieldType::Float => render_f32(doc.require::<f32>(key)?),
        FieldType::Double => Value::from(doc.require::<f64>(key)?),
        FieldType::Value => doc.require::<Value>(key)?,
        FieldType::Mapping => Value::Object(doc.require::<Map<String, Value>>(key)?),
        FieldType::Date => render_date(doc.require_date(key)?)?,
    };
    Ok(value)
}

fn date_default(value: &Value) -> Result<time::OffsetDateTime, Error> {
    let text = value.as_str().ok_or_else(|| {
        Error::new(ErrorKind::Usage).with_message("--default for a date must be a string")
    })?;
    parse_iso8601(text).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("--default {text:?} is not an ISO-8601 date"))
            .with_hint("Use RFC 3339, e.g. 2024-01-01T00:00:00Z.")
            .with_source(err)
    })
}

fn render_date(date: time::OffsetDateTime) -> Result<Value, Error> {
    format_rfc3339_utc(date).map(Value::String)
}

/// Shortest decimal that round-trips the `f32`, so `0.1` prints as `0.1`.
fn render_f32(value: f32) -> Value {
    value
        .to_string()
        .parse::<f64>()
        .map(Value::from)
        .unwrap_or_default()
}

fn kind_label(kind: FieldType) -> &'static str {
    match kind {
        FieldType::String => "string",
        FieldType::Bool => "bool",
        FieldType::Int => "int",
        FieldType::Float => "float",
        FieldType::Double => "double",
        FieldType::Date => "date",
        FieldType::Value => "value",
        FieldType::Mapping => "mapping",
    }
}
