use anyhow::{Context, Result};
use colored::Colorize;

use wardfhir_client::{FhirClientConfig, TokenStore, oauth};

use crate::cli::{AuthFlow, LoginArgs};
use crate::config::{self, ProfileConfig};
use crate::output::{print_error, print_success};

pub async fn login(server: &str, args: &LoginArgs, profile: &str) -> Result<()> {
    match args.auth_flow {
        AuthFlow::Basic => login_basic(server, args, profile),
        AuthFlow::OAuth => login_oauth(server, args, profile).await,
    }
}

fn login_basic(server: &str, args: &LoginArgs, profile: &str) -> Result<()> {
    let username = args.username.as_deref().context("--username is required")?;
    let password = args.password.as_deref().context("--password is required")?;

    let mut cfg = config::load_profile(profile)?;
    cfg.server = Some(server.to_string());
    cfg.api_user = Some(username.to_string());
    cfg.api_key = Some(password.to_string());
    config::save_profile(profile, &cfg)?;

    print_success(&format!(
        "Saved Basic Auth credentials for {} (user: {})",
        server.cyan(),
        username.cyan()
    ));
    Ok(())
}

async fn login_oauth(server: &str, args: &LoginArgs, profile: &str) -> Result<()> {
    let client_id = args
        .client_id
        .as_deref()
        .context("--client-id is required for --auth-flow oauth")?;

    let config = FhirClientConfig::builder(server)
        .oauth_client_id(client_id)
        .token_store(token_store()?)
        .build()?;

    let token_resp = if let Some(client_secret) = &args.client_secret {
        println!("Logging in with client credentials...");
        oauth::client_credentials_grant(&config, client_secret).await?
    } else {
        let username = args
            .username
            .as_deref()
            .context("--username is required for the OAuth password grant")?;
        let password = args
            .password
            .as_deref()
            .context("--password is required for the OAuth password grant")?;
        println!("Logging in as {username} (OAuth)...");
        oauth::password_grant(&config, username, password).await?
    };

    // Completes the flow: the token is persisted through the config's store.
    config.set_auth_token(token_resp.access_token);

    let mut cfg = config::load_profile(profile)?;
    cfg.server = Some(server.to_string());
    config::save_profile(profile, &cfg)?;

    print_success(&format!("Logged in to {} (OAuth Bearer)", server.cyan()));
    Ok(())
}

pub fn logout() -> Result<()> {
    let store = token_store()?;
    if store.get().is_some() {
        store.set(None);
        print_success("Logged out (token cleared)");
    } else {
        println!("No stored token found");
    }
    Ok(())
}

pub fn whoami(profile: &str) -> Result<()> {
    let cfg: ProfileConfig = config::load_profile(profile)?;
    println!("{}: {}", "Profile".cyan(), profile);
    println!(
        "{}: {}",
        "Server".cyan(),
        cfg.server.as_deref().unwrap_or("(not set)")
    );

    if let Some(token) = token_store()?.get() {
        let preview = if token.len() > 20 {
            format!("{}...{}", &token[..8], &token[token.len() - 8..])
        } else {
            token
        };
        println!("{}: Bearer (token: {preview})", "Auth".cyan());
    } else if let Some(user) = &cfg.api_user {
        println!("{}: Basic (user: {user})", "Auth".cyan());
    } else {
        print_error(&format!("Not logged in (profile: \"{profile}\")"));
    }
    Ok(())
}

pub fn token_store() -> Result<TokenStore> {
    Ok(TokenStore::with_dir(config::config_dir()?))
}
