use std::io::{self, BufRead, Read, Write};

use serde_json::{json, Value};

use crate::auth::{PermissionGate, PermissionId};
use crate::cli::OutputFormat;
use crate::error::ApiError;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(extra)) = data {
                if let Some(object) = response.as_object_mut() {
                    object.extend(extra);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Report a failed API call; JSON mode also prints the error body on stdout
pub fn api_failure(output_format: &OutputFormat, err: ApiError) -> anyhow::Error {
    if let OutputFormat::Json = output_format {
        println!("{}", err.to_json());
    }
    anyhow::Error::new(err)
}

/// Print an API payload; text mode pretty-prints it as well
pub fn output_value(output_format: &OutputFormat, value: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string(value)?),
        OutputFormat::Text => match value {
            Value::Null => println!("(empty response)"),
            Value::String(s) => println!("{}", s),
            other => println!("{}", serde_json::to_string_pretty(other)?),
        },
    }
    Ok(())
}

/// Client-side gate for an action; a denial is an error so the process exits non-zero
pub fn gate_action(
    gate: &PermissionGate,
    required: Option<PermissionId>,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let Some(required) = required else {
        return Ok(());
    };

    if gate.has_access(required) {
        return Ok(());
    }

    let message = format!("Permission {} is not granted to the current session", required);
    if let OutputFormat::Json = output_format {
        output_error(output_format, &message, Some("PERMISSION_DENIED"))?;
    }
    Err(anyhow::anyhow!(message))
}

/// Read a JSON document from stdin
pub fn read_stdin_json() -> anyhow::Result<Value> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    if input.trim().is_empty() {
        return Err(anyhow::anyhow!("Expected a JSON body on stdin"));
    }
    serde_json::from_str(&input).map_err(|e| anyhow::anyhow!("Invalid JSON on stdin: {}", e))
}

/// Prompt on stderr and read one line from stdin
pub fn prompt_line(label: &str) -> anyhow::Result<String> {
    eprint!("{}: ", label);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Parse `key=value` pairs into query parameters
pub fn parse_query(pairs: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| anyhow::anyhow!("Query parameter '{}' must be key=value", pair))
        })
        .collect()
}
