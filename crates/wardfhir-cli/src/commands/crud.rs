use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;

use wardfhir_client::{FhirClientConfig, Reference, ResourceClient, templates};

use crate::cli::{CreateArgs, OutputFormat};
use crate::output::{print_success, print_value};

fn read_body(file: &Option<String>) -> Result<serde_json::Value> {
    let content = match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Invalid JSON")
}

pub async fn get(
    config: Arc<FhirClientConfig>,
    reference: &str,
    format: OutputFormat,
) -> Result<()> {
    let reference = Reference::parse(reference)?;
    let client = make_client(config, &reference.resource_type);
    let resource = client.get_by_id(&reference.id, true).await?;
    print_value(&resource, format);
    Ok(())
}

pub async fn create(
    config: Arc<FhirClientConfig>,
    args: &CreateArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut body = if args.template {
        templates::template(&args.resource_type).with_context(|| {
            format!("No default template registered for {}", args.resource_type)
        })?
    } else {
        read_body(&args.file)?
    };

    let client = make_client(config, &args.resource_type);
    let created = client.create(&mut body).await?;
    let id = created.get("id").and_then(|v| v.as_str()).unwrap_or("?");
    print_success(&format!(
        "Created {}/{}",
        args.resource_type.cyan(),
        id.cyan()
    ));
    print_value(&created, format);
    Ok(())
}

pub async fn update(
    config: Arc<FhirClientConfig>,
    reference: &str,
    file: &Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let reference = Reference::parse(reference)?;
    let mut body = read_body(file)?;
    if let Some(resource) = body.as_object_mut()
        && !resource.contains_key("id")
    {
        // The instance URL comes from the resource itself.
        resource.insert(
            "id".to_string(),
            serde_json::Value::String(reference.id.clone()),
        );
    }
    let client = make_client(config, &reference.resource_type);
    let updated = client.update(&mut body).await?;
    print_success(&format!("Updated {}", reference.to_string().cyan()));
    print_value(&updated, format);
    Ok(())
}

pub async fn delete(config: Arc<FhirClientConfig>, reference: &str) -> Result<()> {
    let reference = Reference::parse(reference)?;
    let client = make_client(config, &reference.resource_type);
    client.delete(&reference.id).await?;
    print_success(&format!("Deleted {}", reference.to_string().cyan()));
    Ok(())
}

pub fn make_client(config: Arc<FhirClientConfig>, resource_type: &str) -> ResourceClient {
    ResourceClient::new(config, resource_type)
        .with_auth_failure_handler(Arc::new(wardfhir_client::ClearTokenOnUnauthorized))
}
