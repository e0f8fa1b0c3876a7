//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)
//!
//! Toasts raised by the sync coordinator go to stderr so JSON on stdout
//! stays parseable.

use guru_core::markdown::{plain_text, Block, RenderedArticle};
use guru_core::search::SearchQuery;
use guru_core::{Article, Severity, SiteConfig, Toast};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a full article: header, lead, body, intel and related stories
    pub fn print_article(&self, article: &Article, rendered: &RenderedArticle, related: &[&Article]) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", article.title);
                println!("{} · {}", article.location, article.category);
                println!("Slug:  {}", article.slug);
                println!("ID:    {}", article.id);
                if let Some(created) = article.created_at.confirmed() {
                    println!("Date:  {}", created.format("%Y-%m-%d"));
                }
                if !article.hero_image().is_empty() {
                    println!("Hero:  {}", article.hero_image());
                }
                if !article.is_published() {
                    println!("Status: draft");
                }

                if let Some(ref lead) = rendered.lead {
                    println!();
                    println!("{}", lead);
                }
                for block in &rendered.blocks {
                    println!();
                    print_block(block);
                }

                println!();
                println!("── Guru Intel ──");
                println!("Best time: {}", article.best_time());
                println!("Budget:    {}", article.budget());
                println!("Must try:  {}", article.must_try());

                if !related.is_empty() {
                    println!();
                    println!("── Related ──");
                    for other in related {
                        println!("{} | {}", other.slug, truncate(&other.title, 60));
                    }
                }
            }
            OutputFormat::Json => {
                let related: Vec<_> = related
                    .iter()
                    .map(|a| serde_json::json!({"id": a.id, "slug": a.slug, "title": a.title}))
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "article": article,
                        "lead": rendered.lead,
                        "blocks": rendered.blocks,
                        "related": related
                    })
                );
            }
            OutputFormat::Quiet => {
                println!("{}", article.id);
            }
        }
    }

    /// Print a list of articles
    pub fn print_articles(&self, articles: &[&Article]) {
        match self.format {
            OutputFormat::Human => {
                if articles.is_empty() {
                    println!("No articles found.");
                    return;
                }
                for article in articles {
                    println!(
                        "{} | {} | {} | {}",
                        truncate(&article.slug, 30),
                        truncate(&article.title, 40),
                        article.category,
                        truncate(&article.location, 25)
                    );
                }
                println!("\n{} article(s)", articles.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!(articles));
            }
            OutputFormat::Quiet => {
                for article in articles {
                    println!("{}", article.id);
                }
            }
        }
    }

    /// Print search hits with the query highlighted in title and location
    pub fn print_search_results(&self, query: &str, hits: &[&Article]) {
        match self.format {
            OutputFormat::Human => {
                let Some(pattern) = SearchQuery::new(query) else {
                    println!("Search is inactive: enter a query.");
                    return;
                };
                if hits.is_empty() {
                    println!("No results for '{}'.", query);
                    return;
                }
                let (open, close) = if atty::is(atty::Stream::Stdout) {
                    ("\x1b[7m", "\x1b[0m")
                } else {
                    ("[", "]")
                };
                for article in hits {
                    println!(
                        "{} | {} | {}",
                        truncate(&article.slug, 30),
                        pattern.highlight_with(&article.title, open, close),
                        pattern.highlight_with(&article.location, open, close)
                    );
                }
                println!("\n{} result(s) for '{}'", hits.len(), query);
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"query": query, "results": hits})
                );
            }
            OutputFormat::Quiet => {
                for article in hits {
                    println!("{}", article.id);
                }
            }
        }
    }

    pub fn print_site_config(&self, site: &SiteConfig) {
        match self.format {
            OutputFormat::Human => {
                println!("Homepage:");
                println!("  hero_title:     {}", site.hero_title);
                println!("  hero_highlight: {}", site.hero_highlight);
                println!("  hero_subtitle:  {}", site.hero_subtitle);
                println!("  hero_image_url: {}", site.hero_image_url);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!(site));
            }
            OutputFormat::Quiet => {
                println!("{} {}", site.hero_title, site.hero_highlight);
            }
        }
    }

    /// Print notifications raised during the command
    pub fn print_toasts(&self, toasts: &[Toast]) {
        for toast in toasts {
            match self.format {
                OutputFormat::Human => eprintln!("{} {}", toast_marker(toast.severity), toast.message),
                OutputFormat::Json => eprintln!("{}", serde_json::json!({"toast": toast})),
                OutputFormat::Quiet => {
                    if toast.severity == Severity::Error {
                        eprintln!("{}", toast.message);
                    }
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_block(block: &Block) {
    match block {
        Block::Heading { level, content } => {
            let text = plain_text(content);
            println!("{}", text);
            if *level == 2 {
                println!("{}", "─".repeat(text.chars().count()));
            }
        }
        Block::Image { src, caption } => {
            if caption.is_empty() {
                println!("[image] {}", src);
            } else {
                println!("[image: {}] {}", caption, src);
            }
        }
        Block::Quote { content } => println!("  │ {}", plain_text(content)),
        Block::List { items } => {
            for item in items {
                println!("  • {}", plain_text(item));
            }
        }
        Block::Paragraph { content } => println!("{}", plain_text(content)),
    }
}

fn toast_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✓",
        Severity::Error => "✗",
        Severity::Info => "•",
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
