use colored::Colorize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_value(value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).unwrap());
        }
        OutputFormat::Table => {
            print_as_table(value);
        }
    }
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn print_as_table(value: &Value) {
    if let Some(resources) = extract_resources(value) {
        if resources.is_empty() {
            println!("No resources found.");
            return;
        }
        let mut builder = Builder::default();
        builder.push_record(["ID", "ResourceType", "LastUpdated"]);
        for resource in &resources {
            let id = resource.get("id").and_then(|v| v.as_str()).unwrap_or("-");
            let rt = resource
                .get("resourceType")
                .and_then(|v| v.as_str())
                .unwrap_or("-");
            let updated = resource
                .get("meta")
                .and_then(|m| m.get("lastUpdated"))
                .and_then(|v| v.as_str())
                .unwrap_or("-");
            builder.push_record([id, rt, updated]);
        }
        let table = builder.build().with(Style::rounded()).to_string();
        println!("{table}");
        if let Some(total) = value.get("total").and_then(|v| v.as_u64()) {
            println!("Total: {total}");
        }
    } else {
        // Single resource — header line plus the full body
        let rt = value
            .get("resourceType")
            .and_then(|v| v.as_str())
            .unwrap_or("Resource");
        let id = value.get("id").and_then(|v| v.as_str()).unwrap_or("-");
        println!("{} {}/{}", "Resource:".cyan(), rt.cyan(), id.cyan());
        println!("{}", serde_json::to_string_pretty(value).unwrap());
    }
}

/// Rows for the table form: bundle entries or an already-flat resource list.
fn extract_resources(value: &Value) -> Option<Vec<&Value>> {
    match value {
        Value::Array(items) => Some(items.iter().collect()),
        Value::Object(_) if value.get("resourceType").and_then(|v| v.as_str()) == Some("Bundle") => {
            let entries = value.get("entry")?.as_array()?;
            Some(
                entries
                    .iter()
                    .map(|entry| entry.get("resource").unwrap_or(entry))
                    .collect(),
            )
        }
        _ => None,
    }
}
