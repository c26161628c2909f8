//! Aula CLI: upload, resolve and delete intranet assets from the command line.
//!
//! Storage settings come from the environment (or `.env`): AULA_CDN_BUCKET,
//! AULA_CDN_REGION, AULA_CDN_PUBLIC_URL, LOCAL_STORAGE_PATH,
//! LOCAL_STORAGE_BASE_URL, ...

use anyhow::Context;
use aula_assets::{classify, AssetService, ReferenceResolver};
use aula_cli::{init_tracing, read_asset_file, ErrorResponse};
use aula_core::{AssetPurpose, Config, ProviderId};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "aula", about = "Aula asset storage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file for a purpose (profile, avatars, logos, documents, ...)
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
        /// Asset purpose
        #[arg(long)]
        purpose: AssetPurpose,
        /// Content type; guessed from the extension when omitted
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Resolve a stored reference to a displayable URL
    Resolve {
        /// Stored reference (filename, folder/filename or URL)
        reference: String,
        /// Asset purpose
        #[arg(long)]
        purpose: AssetPurpose,
    },
    /// Delete the asset behind a stored reference
    Delete {
        /// Stored reference (filename, folder/filename or URL)
        reference: String,
        /// Owning provider: cdn or local. Inferred when omitted
        #[arg(long)]
        provider: Option<ProviderId>,
        /// Purpose the reference was stored for; places bare filenames in its folder
        #[arg(long)]
        purpose: Option<AssetPurpose>,
    },
    /// Classify a MIME type
    Classify {
        /// MIME type, e.g. image/png
        content_type: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn service(config: &Config) -> anyhow::Result<AssetService> {
    AssetService::from_config(config)
        .await
        .context("Failed to initialize asset storage. Set AULA_CDN_BUCKET and AULA_CDN_REGION")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            file,
            purpose,
            content_type,
        } => {
            let config = Config::from_env()?;
            let service = service(&config).await?;
            let asset = read_asset_file(&file, content_type.as_deref()).await?;

            match service.upload(asset, purpose).await {
                Ok(result) => print_json(&result)?,
                Err(e) => {
                    print_json(&ErrorResponse::from(&e))?;
                    return Err(e).with_context(|| format!("Upload of {} failed", file.display()));
                }
            }
        }
        Commands::Resolve { reference, purpose } => {
            let config = Config::from_env()?;
            let resolver = ReferenceResolver::new(config.local.base_url.clone());
            let url = resolver.resolve(Some(reference.as_str()), purpose);
            print_json(&serde_json::json!({
                "reference": reference,
                "purpose": purpose,
                "url": url,
            }))?;
        }
        Commands::Delete {
            reference,
            provider,
            purpose,
        } => {
            let config = Config::from_env()?;
            let service = service(&config).await?;
            if let Err(e) = service
                .delete(Some(reference.as_str()), provider, purpose)
                .await
            {
                print_json(&ErrorResponse::from(&e))?;
                return Err(e).with_context(|| format!("Failed to delete {}", reference));
            }
            print_json(&serde_json::json!({
                "success": true,
                "reference": reference,
            }))?;
        }
        Commands::Classify { content_type } => {
            print_json(&serde_json::json!({
                "contentType": content_type,
                "category": classify(&content_type),
            }))?;
        }
    }

    Ok(())
}
