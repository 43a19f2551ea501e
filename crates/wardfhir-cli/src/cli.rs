use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "wardfhir")]
#[command(about = "WardFHIR CLI — interact with any FHIR-style server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides config and WARDFHIR_URL env var)
    #[arg(short, long, global = true, env = "WARDFHIR_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "WARDFHIR_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Login to a FHIR server
    Login(LoginArgs),
    /// Logout (clear the stored token)
    Logout,
    /// Show current auth info
    Whoami,
    /// Read a resource by reference (e.g. Patient/123)
    Get(GetArgs),
    /// Create a new resource
    Create(CreateArgs),
    /// Update a resource
    Update(UpdateArgs),
    /// Delete a resource
    Delete(DeleteArgs),
    /// Search for resources
    Search(SearchArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum AuthFlow {
    /// HTTP Basic Auth (default) — stores the API user and key in the profile
    #[default]
    Basic,
    /// OAuth 2.0 — obtains and stores a Bearer token
    OAuth,
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// API user / username
    #[arg(short, long)]
    pub username: Option<String>,
    /// API key / password
    #[arg(long)]
    pub password: Option<String>,
    /// Auth flow to use
    #[arg(long, default_value = "basic")]
    pub auth_flow: AuthFlow,
    /// OAuth client ID (required for --auth-flow oauth)
    #[arg(long)]
    pub client_id: Option<String>,
    /// OAuth client secret (triggers the client_credentials grant)
    #[arg(long)]
    pub client_secret: Option<String>,
}

#[derive(clap::Args)]
pub struct GetArgs {
    /// Resource reference (e.g. Patient/123)
    pub reference: String,
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Resource type (e.g. Patient)
    pub resource_type: String,
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long, conflicts_with = "template")]
    pub file: Option<String>,
    /// Start from the registered default shape for the resource type
    #[arg(long)]
    pub template: bool,
}

#[derive(clap::Args)]
pub struct UpdateArgs {
    /// Resource reference (e.g. Patient/123)
    pub reference: String,
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(clap::Args)]
pub struct DeleteArgs {
    /// Resource reference (e.g. Patient/123)
    pub reference: String,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum SearchShape {
    /// Raw bundle as returned by the server
    #[default]
    Raw,
    /// Flat list of the contained resources
    Flat,
    /// Resources grouped by resource type and id
    Grouped,
}

#[derive(clap::Args)]
pub struct SearchArgs {
    /// Resource type (e.g. Patient)
    pub resource_type: String,
    /// Search parameters as key=value pairs (e.g. subject=pat-1 status=final)
    pub params: Vec<String>,
    /// Referenced resource types to include (repeatable)
    #[arg(long)]
    pub include: Vec<String>,
    /// Request a summarized response (-summary=true)
    #[arg(long)]
    pub summary: bool,
    /// Response shape
    #[arg(long, default_value = "raw")]
    pub shape: SearchShape,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, api_user, api_key)
    pub key: String,
    /// Value
    pub value: String,
}
