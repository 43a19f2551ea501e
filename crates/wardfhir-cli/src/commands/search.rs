use std::sync::Arc;

use anyhow::Result;

use wardfhir_client::{FhirClientConfig, SearchParams};

use crate::cli::{OutputFormat, SearchArgs, SearchShape};
use crate::commands::crud::make_client;
use crate::output::print_value;

pub async fn search(
    config: Arc<FhirClientConfig>,
    args: &SearchArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut params = SearchParams::new();
    for raw in &args.params {
        let mut parts = raw.splitn(2, '=');
        let key = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("");
        params.push(key, value);
    }
    let mut params = params.include(args.include.iter());
    if args.summary {
        params = params.with("-summary", true);
    }
    params = params.format_json();

    let client = make_client(config, &args.resource_type);
    let value = match args.shape {
        SearchShape::Raw => serde_json::to_value(client.search(&params).await?)?,
        SearchShape::Flat => serde_json::Value::Array(client.list(&params).await?),
        SearchShape::Grouped => serde_json::to_value(client.list_grouped(&params).await?)?,
    };
    print_value(&value, format);
    Ok(())
}
