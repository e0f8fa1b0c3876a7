//! Homepage configuration commands

use anyhow::{bail, Context, Result};

use guru_core::SyncCoordinator;

use crate::output::Output;

/// Show the current homepage configuration
pub fn show(sync: &SyncCoordinator, output: &Output) -> Result<()> {
    output.print_site_config(sync.site_config());
    Ok(())
}

/// Change homepage fields; saved to the local cache only
pub async fn set(
    sync: &mut SyncCoordinator,
    hero_title: Option<String>,
    hero_highlight: Option<String>,
    hero_subtitle: Option<String>,
    hero_image: Option<String>,
    output: &Output,
) -> Result<()> {
    if hero_title.is_none() && hero_highlight.is_none() && hero_subtitle.is_none() && hero_image.is_none() {
        bail!("Nothing to change. Pass at least one of --hero-title, --hero-highlight, --hero-subtitle, --hero-image");
    }

    let mut site = sync.site_config().clone();
    if let Some(v) = hero_title {
        site.hero_title = v;
    }
    if let Some(v) = hero_highlight {
        site.hero_highlight = v;
    }
    if let Some(v) = hero_subtitle {
        site.hero_subtitle = v;
    }
    if let Some(v) = hero_image {
        site.hero_image_url = v;
    }

    sync.update_site_config(site)
        .await
        .context("Failed to save homepage configuration")?;

    output.print_site_config(sync.site_config());
    Ok(())
}
