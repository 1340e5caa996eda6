//! Secret management commands.

use anyhow::Result;
use chutils_config::ConfigContext;
use chutils_config::constants::DOTENV_FILE_NAME;
use chutils_secrets::SecretManager;
use clap::Subcommand;
use secrecy::ExposeSecret;

use crate::error::CommandError;

#[derive(Subcommand)]
pub enum SecretCommand {
    /// Print a secret (credential store first, then the project's .env)
    Get {
        /// Secret key
        key: String,

        /// Service name (defaults to the project root path)
        #[arg(short, long)]
        service: Option<String>,
    },

    /// Store or overwrite a secret
    Set {
        /// Secret key
        key: String,

        /// Secret value
        value: String,

        /// Service name (defaults to the project root path)
        #[arg(short, long)]
        service: Option<String>,
    },

    /// Delete a secret (succeeds when it does not exist)
    Delete {
        /// Secret key
        key: String,

        /// Service name (defaults to the project root path)
        #[arg(short, long)]
        service: Option<String>,
    },
}

pub fn run(command: SecretCommand, ctx: &ConfigContext) -> Result<()> {
    match command {
        SecretCommand::Get { key, service } => {
            let secrets = manager(ctx, service.as_deref())?;
            let secret = secrets.get(&key).ok_or_else(|| {
                CommandError::NotFound(format!(
                    "Secret '{key}' not found for service '{}'",
                    secrets.service_name()
                ))
            })?;
            println!("{}", secret.expose_secret());
        }
        SecretCommand::Set {
            key,
            value,
            service,
        } => {
            let secrets = manager(ctx, service.as_deref())?;
            if !secrets.save(&key, &value) {
                return Err(CommandError::Failed(format!("Failed to save secret '{key}'")).into());
            }
            println!("Saved secret '{key}'");
        }
        SecretCommand::Delete { key, service } => {
            let secrets = manager(ctx, service.as_deref())?;
            if !secrets.delete(&key) {
                return Err(CommandError::Failed(format!("Failed to delete secret '{key}'")).into());
            }
            println!("Deleted secret '{key}'");
        }
    }
    Ok(())
}

fn manager(ctx: &ConfigContext, service: Option<&str>) -> Result<SecretManager> {
    let secrets = match service {
        Some(service) => SecretManager::new(service)?
            .with_dotenv_path(ctx.project_root().join(DOTENV_FILE_NAME)),
        None => SecretManager::for_project(ctx)?,
    };
    Ok(secrets)
}
