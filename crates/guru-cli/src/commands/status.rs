//! Status command handler

use anyhow::Result;

use guru_core::{Config, SyncCoordinator};

use crate::output::{Output, OutputFormat};

/// Show where the articles came from and how the install is wired
pub fn show(sync: &SyncCoordinator, config: &Config, output: &Output) -> Result<()> {
    let total = sync.articles().len();
    let published = sync.articles().iter().filter(|a| a.is_published()).count();
    let source = sync
        .last_source()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "not loaded".to_string());

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "source": sync.last_source(),
                    "remote_ready": sync.remote_ready(),
                    "cache_path": config.cache_path(),
                    "site_url": config.site_url,
                    "dev_secrets": config.uses_dev_secrets(),
                    "counts": {
                        "articles": total,
                        "published": published,
                        "drafts": total - published
                    },
                    "site": sync.site_config()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", source);
        }
        OutputFormat::Human => {
            println!("Travel Guru Status");
            println!("==================");
            println!();
            println!("Articles:");
            println!("  Source:    {}", source);
            println!("  Total:     {}", total);
            println!("  Published: {}", published);
            println!("  Drafts:    {}", total - published);
            println!();
            println!("Remote store:");
            println!(
                "  Status: {}",
                if sync.remote_ready() {
                    "configured"
                } else {
                    "not configured (local mode)"
                }
            );
            println!();
            println!("Storage:");
            println!("  Cache: {}", config.cache_path().display());
            println!();
            println!("Site:");
            println!("  URL:  {}", config.site_url);
            println!(
                "  Hero: {} {}",
                sync.site_config().hero_title,
                sync.site_config().hero_highlight
            );
            if config.uses_dev_secrets() {
                println!();
                println!("⚠ Development secrets in use. Set api_secret_token and admin_password.");
            }
        }
    }

    Ok(())
}
