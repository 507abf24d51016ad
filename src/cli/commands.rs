//! CLI command implementations
//!
//! Every command loads the configuration, builds the dictionary, runs one
//! query and prints a single JSON response. Nothing is kept between runs.

use std::path::Path;

use serde_json::{json, Map, Value as JsonValue};

use crate::dictionary::{open_dictionary, Defaults, DirectDictionary};
use crate::source::Block;
use crate::types::{with_underlying_type, AttributeUnderlyingType, AttributeValue, Key, Value};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments, dispatches, and prints the response.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    match run_command(cli.command) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<JsonValue> {
    match cmd {
        Command::Get {
            config,
            attribute,
            keys,
            default,
        } => get(&load(&config)?, &attribute, &keys, default.as_deref()),
        Command::Has { config, keys } => has(&load(&config)?, &keys),
        Command::IsIn {
            config,
            child,
            ancestor,
        } => is_in(&load(&config)?, &child, &ancestor),
        Command::Ids { config } => ids(&load(&config)?),
        Command::Dump {
            config,
            columns,
            max_block_size,
        } => dump(&load(&config)?, &columns, max_block_size),
        Command::Info { config } => info(&load(&config)?),
    }
}

fn load(config_path: &Path) -> CliResult<DirectDictionary> {
    Ok(open_dictionary(config_path)?)
}

/// Look up one attribute; `default` replaces the null default when given
pub fn get(
    dict: &DirectDictionary,
    attribute: &str,
    keys: &[Key],
    default: Option<&str>,
) -> CliResult<JsonValue> {
    let ty = dict.attribute(attribute)?.underlying_type();
    let default = default.map(|raw| parse_default(ty, raw)).transpose()?;

    let values = with_underlying_type!(ty, T => lookup::<T>(dict, attribute, keys, default)?);
    Ok(JsonValue::Array(values.iter().map(Value::to_json).collect()))
}

fn lookup<T: AttributeValue>(
    dict: &DirectDictionary,
    attribute: &str,
    keys: &[Key],
    default: Option<Value>,
) -> CliResult<Vec<Value>> {
    let defaults = match default {
        Some(value) => Defaults::Constant(T::from_value(&value).ok_or_else(|| {
            CliError::invalid_argument(format!("default {} is not a {}", value, T::TYPE))
        })?),
        None => Defaults::Null,
    };

    let values = dict.get::<T>(attribute, keys, defaults)?;
    Ok(values.into_iter().map(AttributeValue::into_value).collect())
}

/// Parses a `--default` argument as JSON, falling back to a bare string
fn parse_default(ty: AttributeUnderlyingType, raw: &str) -> CliResult<Value> {
    let json = match serde_json::from_str::<JsonValue>(raw) {
        Ok(JsonValue::String(s)) => JsonValue::String(s),
        Ok(other) if ty != AttributeUnderlyingType::String => other,
        _ => JsonValue::String(raw.to_string()),
    };

    Value::from_json(ty, &json)
        .map_err(|reason| CliError::invalid_argument(format!("invalid --default: {}", reason)))
}

/// Check which keys exist
pub fn has(dict: &DirectDictionary, keys: &[Key]) -> CliResult<JsonValue> {
    Ok(json!(dict.has(keys)?))
}

/// Check ancestry. A single key on either side is applied to every key on
/// the other side.
pub fn is_in(dict: &DirectDictionary, child: &[Key], ancestor: &[Key]) -> CliResult<JsonValue> {
    let hierarchy = dict
        .hierarchy()
        .ok_or_else(|| CliError::no_hierarchy(dict.full_name()))?;

    let result = match (child, ancestor) {
        ([child], ancestors) if ancestors.len() != 1 => {
            hierarchy.is_in_constant_vector(*child, ancestors)?
        }
        (children, [ancestor]) => hierarchy.is_in_vector_constant(children, *ancestor)?,
        (children, ancestors) => hierarchy.is_in_vector_vector(children, ancestors)?,
    };

    Ok(json!(result))
}

/// List every key in scan order
pub fn ids(dict: &DirectDictionary) -> CliResult<JsonValue> {
    Ok(json!(dict.get_ids()?))
}

/// Export all keys as blocks of row objects
pub fn dump(
    dict: &DirectDictionary,
    columns: &[String],
    max_block_size: usize,
) -> CliResult<JsonValue> {
    let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
    let stream = dict.block_stream(&columns, max_block_size)?;

    let mut blocks = Vec::new();
    for block in stream {
        blocks.push(block_to_json(&block?));
    }
    Ok(JsonValue::Array(blocks))
}

fn block_to_json(block: &Block) -> JsonValue {
    let rows = (0..block.rows())
        .map(|row| {
            let mut object = Map::new();
            for column in block.columns() {
                object.insert(column.name().to_string(), column.values()[row].to_json());
            }
            JsonValue::Object(object)
        })
        .collect();
    JsonValue::Array(rows)
}

/// Show structure and counters
pub fn info(dict: &DirectDictionary) -> CliResult<JsonValue> {
    let attributes: Vec<JsonValue> = dict
        .attributes()
        .iter()
        .map(|a| {
            json!({
                "name": a.name(),
                "type": a.underlying_type().type_name(),
                "null_value": a.null_value().to_json(),
                "hierarchical": a.is_hierarchical(),
                "injective": a.is_injective(),
            })
        })
        .collect();

    Ok(json!({
        "name": dict.full_name(),
        "type": dict.type_name(),
        "source": dict.source().describe(),
        "lifetime": dict.lifetime(),
        "id": dict.structure().id.name,
        "attributes": attributes,
        "metrics": dict.metrics().snapshot(),
        "hit_rate": dict.hit_rate(),
        "element_count": dict.element_count(),
        "load_factor": dict.load_factor(),
    }))
}
