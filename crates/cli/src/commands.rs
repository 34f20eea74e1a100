//! CLI commands

use anyhow::{Context as _, Result, bail};
use carecom_core::{CredentialStoreExt, FileStore, Role, decode_claims};
use carecom_http::client::ApiClient;
use carecom_http::services::{
    AuthService, MonitoringService, PmoService, ProfileService, RegisterRequest,
    UpdateProfileRequest,
};
use carecom_http::{ApiRequest, ApiResponse};
use chrono::Utc;
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::{self, CliConfig};
use crate::terminal::{ConsoleNavigator, ConsoleNotifier};

/// Settings shared by every command
pub struct Context {
    pub data_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    /// Overrides the configured default timeout, in seconds
    pub timeout: Option<u64>,
    pub cancel: CancellationToken,
}

impl Context {
    fn load_config(&self) -> Result<CliConfig> {
        let mut config = CliConfig::load(self.config_path.as_deref(), &self.data_dir)?;
        if let Some(timeout) = self.timeout {
            config.api.timeout_secs = Some(timeout);
        }
        Ok(config)
    }

    fn store(&self) -> Result<FileStore> {
        FileStore::in_dir(&self.data_dir).with_context(|| {
            format!("failed to open credential store in {}", self.data_dir.display())
        })
    }

    fn client(&self) -> Result<ApiClient> {
        let config = self.load_config()?;
        let client = ApiClient::builder(config.api)
            .credential_store(Arc::new(self.store()?))
            .notifier(Arc::new(ConsoleNotifier))
            .navigator(Arc::new(ConsoleNavigator))
            .build()?;
        Ok(client)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        email: String,

        #[arg(long, env = "CARECOM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "CARECOM_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        phone: Option<String>,

        /// admin, perawat or pmo
        #[arg(long)]
        role: Option<Role>,
    },

    /// Forget the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// Send a request to any endpoint
    Request {
        #[arg(value_enum)]
        method: HttpMethod,

        /// Path relative to the API base URL
        path: String,

        /// JSON request body
        #[arg(long)]
        data: Option<String>,

        /// Query parameter as key=value, repeatable
        #[arg(long = "query", short = 'q')]
        query: Vec<String>,
    },

    /// Show the patient supervised by the logged-in PMO
    Patient,

    /// Submit today's monitoring report for a scanned patient code
    Monitor { code: String },

    /// Profile of the logged-in user
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Configuration file operations
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    Show,

    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate a default configuration file
    Init {
        /// Output file path (defaults to <data-dir>/carecom.toml)
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    fn request(self, path: String) -> ApiRequest {
        match self {
            Self::Get => ApiRequest::get(path),
            Self::Post => ApiRequest::post(path),
            Self::Put => ApiRequest::put(path),
            Self::Patch => ApiRequest::patch(path),
            Self::Delete => ApiRequest::delete(path),
        }
    }
}

impl Commands {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        match self {
            Self::Login { email, password } => login(ctx, &email, &password).await,
            Self::Register {
                name,
                email,
                password,
                phone,
                role,
            } => {
                let request = RegisterRequest {
                    name,
                    email,
                    password_confirmation: password.clone(),
                    password,
                    phone,
                    role,
                };
                let response = AuthService::new(ctx.client()?).register(&request).await?;
                print_response(&response)
            }
            Self::Logout => {
                AuthService::new(ctx.client()?).logout()?;
                Ok(())
            }
            Self::Whoami => whoami(ctx),
            Self::Request {
                method,
                path,
                data,
                query,
            } => request(ctx, method, path, data, &query).await,
            Self::Patient => {
                let envelope = PmoService::new(ctx.client()?).patient().await?;
                print_json(&envelope)
            }
            Self::Monitor { code } => {
                let response = MonitoringService::new(ctx.client()?)
                    .submit_daily(&code)
                    .await?;
                print_response(&response)
            }
            Self::Profile { command } => command.execute(ctx).await,
            Self::Config { command } => command.execute(ctx),
        }
    }
}

impl ProfileCommands {
    async fn execute(self, ctx: &Context) -> Result<()> {
        let profile = ProfileService::new(ctx.client()?);
        match self {
            Self::Show => print_json(&profile.get().await?),
            Self::Update {
                name,
                email,
                phone,
                address,
            } => {
                let update = UpdateProfileRequest {
                    name,
                    email,
                    phone,
                    address,
                };
                print_response(&profile.update(&update).await?)
            }
        }
    }
}

impl ConfigCommands {
    fn execute(self, ctx: &Context) -> Result<()> {
        match self {
            Self::Init { output, force } => {
                let config_path =
                    output.unwrap_or_else(|| config::default_config_path(&ctx.data_dir));
                if config_path.exists() && !force {
                    bail!(
                        "{} already exists, pass --force to overwrite",
                        config_path.display()
                    );
                }

                config::generate_default_config(&config_path)?;
                println!("Generated configuration at: {}", config_path.display());
                Ok(())
            }
            Self::Show => {
                let config = ctx.load_config()?;
                print!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
        }
    }
}

async fn login(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let outcome = AuthService::new(ctx.client()?)
        .login(email, password)
        .await?;
    info!(role = %outcome.role, "session stored");
    println!("Logged in as {} ({})", email, outcome.role);
    Ok(())
}

fn whoami(ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let Some(token) = store.token() else {
        println!("Not logged in");
        return Ok(());
    };

    let role = store
        .role()
        .map_or_else(|| "unknown".to_string(), |role| role.to_string());
    println!("role: {role}");

    match decode_claims(&token) {
        Ok(claims) => {
            if let Some(subject) = &claims.subject {
                println!("subject: {subject}");
            }
            if let Some(expires_at) = claims.expires_at {
                let state = if claims.is_expired(Utc::now()) {
                    "expired"
                } else {
                    "valid"
                };
                println!("expires: {} ({state})", expires_at.to_rfc3339());
            }
        }
        Err(e) => println!("token: unreadable ({e})"),
    }
    Ok(())
}

async fn request(
    ctx: &Context,
    method: HttpMethod,
    path: String,
    data: Option<String>,
    query: &[String],
) -> Result<()> {
    let client = ctx.client()?;
    let mut request = method.request(path).cancel_on(ctx.cancel.clone());

    for pair in query {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("query parameter {pair} is not key=value");
        };
        request = request.query(key, value);
    }
    if let Some(data) = data {
        let body: Value = serde_json::from_str(&data).context("--data must be valid JSON")?;
        request = request.json(&body);
    }
    if let Some(timeout) = ctx.timeout {
        request = request.timeout(Duration::from_secs(timeout));
    }

    let response = client.send(request).await?;
    print_response(&response)
}

fn print_response(response: &ApiResponse) -> Result<()> {
    print_json(response.body())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_parse_request_command() {
        let cli = TestCli::try_parse_from([
            "carecom", "request", "post", "/perawat/patients", "--data", "{\"name\":\"Budi\"}",
            "-q", "page=2",
        ])
        .unwrap();
        match cli.command {
            Commands::Request {
                method,
                path,
                data,
                query,
            } => {
                assert!(matches!(method, HttpMethod::Post));
                assert_eq!(path, "/perawat/patients");
                assert_eq!(data.as_deref(), Some("{\"name\":\"Budi\"}"));
                assert_eq!(query, vec!["page=2".to_string()]);
            }
            _ => panic!("expected request command"),
        }
    }

    #[test]
    fn test_parse_register_role() {
        let cli = TestCli::try_parse_from([
            "carecom", "register", "--name", "Siti", "--email", "siti@example.id", "--password",
            "rahasia123", "--role", "PMO",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Register {
                role: Some(Role::Pmo),
                ..
            }
        ));
    }

    #[test]
    fn test_config_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            data_dir: dir.path().to_path_buf(),
            config_path: None,
            timeout: None,
            cancel: CancellationToken::new(),
        };

        ConfigCommands::Init {
            output: None,
            force: false,
        }
        .execute(&ctx)
        .unwrap();
        assert!(config::default_config_path(dir.path()).exists());

        let again = ConfigCommands::Init {
            output: None,
            force: false,
        }
        .execute(&ctx);
        assert!(again.is_err());
    }
}
