use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use smartlink_frame::{Message, ModuleInfo, TaggedValue, Value};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    kind: &'a str,
    size: usize,
    hex: String,
}

/// Print an encoded frame.
pub fn print_encoded(kind: &str, wire: &[u8], format: OutputFormat) {
    let hex = hex::encode(wire);
    match format {
        OutputFormat::Json => print_json(&EncodedOutput {
            kind,
            size: wire.len(),
            hex,
        }),
        OutputFormat::Table => print_table(
            &["KIND", "SIZE", "HEX"],
            vec![vec![kind.to_string(), wire.len().to_string(), hex]],
        ),
        OutputFormat::Pretty => println!("kind={kind} size={} hex={hex}", wire.len()),
        OutputFormat::Raw => print_raw(wire),
    }
}

/// Print a decoded message.
pub fn print_message(message: &Message, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(message),
        OutputFormat::Table => print_table(&["FIELD", "VALUE"], field_rows(message)),
        OutputFormat::Pretty => {
            let fields: Vec<String> = field_rows(message)
                .into_iter()
                .map(|row| format!("{}={}", row[0], row[1]))
                .collect();
            println!("{}", fields.join(" "));
        }
        OutputFormat::Raw => print_raw(&message.to_frame().payload),
    }
}

/// Print a list of labelled values, e.g. an inspection report.
pub fn print_report<T: Serialize>(report: &T, rows: Vec<Vec<String>>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => print_table(&["FIELD", "VALUE"], rows),
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in rows {
                println!("{}: {}", row[0], row[1]);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn print_table(header: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    for row in rows {
        table.add_row(row);
    }
    println!("{table}");
}

fn row(field: impl Into<String>, value: impl ToString) -> Vec<String> {
    vec![field.into(), value.to_string()]
}

/// Flatten a message into `field, value` rows.
pub fn field_rows(message: &Message) -> Vec<Vec<String>> {
    let mut rows = vec![row("kind", message.kind())];
    match message {
        Message::Command(cmd) => {
            rows.push(row("command_type", format!("0x{:04x}", cmd.command_type)));
            rows.push(row("w", cmd.w));
            rows.push(row("x", cmd.x));
            rows.push(row("y", cmd.y));
            rows.push(row("z", cmd.z));
            rows.push(row("s", cmd.s));
            rows.push(row("t", cmd.t));
            rows.push(row("u", cmd.u));
            rows.push(row("v", cmd.v));
        }
        Message::Discovery(resp) => {
            rows.push(row("module_count", resp.module_count()));
            for (i, module) in resp.modules().iter().enumerate() {
                rows.push(row(format!("module[{i}]"), describe_module(module)));
            }
        }
        Message::Telemetry(telemetry) => {
            rows.push(row("value", describe_value(&telemetry.value)));
            rows.push(row("source_id", format!("0x{:04x}", telemetry.source_id)));
            rows.push(row("timestamp", telemetry.timestamp));
        }
        Message::Settings(settings) => {
            rows.push(row("value", describe_value(&settings.value)));
            rows.push(row("settings_id", settings.settings_id));
        }
        Message::Value(value) => {
            rows.push(row("value", describe_value(value)));
        }
    }
    rows
}

pub fn describe_value(value: &TaggedValue) -> String {
    match value.value() {
        Value::Empty => "empty".to_string(),
        Value::Int32(n) => format!("int32:{n}"),
        Value::UInt16(n) => format!("uint16:{n}"),
        Value::Float32(n) => format!("float:{n}"),
        Value::Text(text) => format!("string:{text:?}"),
    }
}

fn describe_module(module: &ModuleInfo) -> String {
    format!(
        "type=0x{:04x} instance={} capabilities=0x{:08x}",
        module.type_id, module.instance_id, module.capabilities
    )
}
