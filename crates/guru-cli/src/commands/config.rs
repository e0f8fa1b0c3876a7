//! Config command handlers

use std::path::Path;

use anyhow::{bail, Context, Result};

use guru_core::Config;

use crate::output::{Output, OutputFormat};

const NOT_SET: &str = "(not set)";

/// Show current configuration; secrets are masked
pub fn show(config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = Config::load_with_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "firebase_api_key": config.firebase_api_key.as_deref().map(mask),
                    "firebase_project_id": config.firebase_project_id,
                    "firebase_app_id": config.firebase_app_id,
                    "api_secret_token": config.api_secret_token.as_deref().map(mask),
                    "admin_password": config.admin_password.as_deref().map(mask),
                    "site_url": config.site_url,
                    "bind_addr": config.bind_addr,
                    "remote_configured": config.remote_credentials().is_some()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:            {}", config.data_dir.display());
            println!("  firebase_api_key:    {}", masked(&config.firebase_api_key));
            println!(
                "  firebase_project_id: {}",
                config.firebase_project_id.as_deref().unwrap_or(NOT_SET)
            );
            println!(
                "  firebase_app_id:     {}",
                config.firebase_app_id.as_deref().unwrap_or(NOT_SET)
            );
            println!("  api_secret_token:    {}", masked(&config.api_secret_token));
            println!("  admin_password:      {}", masked(&config.admin_password));
            println!("  site_url:            {}", config.site_url);
            println!("  bind_addr:           {}", config.bind_addr);
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let mut config = Config::load_with_override(config_path).context("Failed to load configuration")?;

    let optional = |value: &str| {
        if value.is_empty() || value == "none" {
            None
        } else {
            Some(value.to_string())
        }
    };

    let secret = match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
            false
        }
        "firebase_api_key" => {
            config.firebase_api_key = optional(&value);
            true
        }
        "firebase_project_id" => {
            config.firebase_project_id = optional(&value);
            false
        }
        "firebase_app_id" => {
            config.firebase_app_id = optional(&value);
            false
        }
        "api_secret_token" => {
            config.api_secret_token = optional(&value);
            true
        }
        "admin_password" => {
            config.admin_password = optional(&value);
            true
        }
        "site_url" => {
            if value.is_empty() {
                bail!("site_url cannot be empty");
            }
            config.site_url = value.trim_end_matches('/').to_string();
            false
        }
        "bind_addr" => {
            if value.is_empty() {
                bail!("bind_addr cannot be empty");
            }
            config.bind_addr = value.clone();
            false
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, firebase_api_key, firebase_project_id, firebase_app_id, \
                 api_secret_token, admin_password, site_url, bind_addr",
                key
            );
        }
    };

    let save_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    let shown = if secret { mask(&value) } else { value };
    output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}

fn masked(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(mask)
        .unwrap_or_else(|| NOT_SET.to_string())
}

/// Keep the last four characters of a secret
fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask("supersecret"), "*******cret");
        assert_eq!(masked(&None), NOT_SET);
    }
}
