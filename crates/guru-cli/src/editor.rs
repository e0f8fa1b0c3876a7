//! Article body editing and delete confirmation
//!
//! Bodies are edited in `$EDITOR` (then `$VISUAL`, then `vi`) through a
//! temporary markdown file. The file opens with a comment header naming the
//! article and the block syntax; those comment lines are removed again when
//! the file is read back.

use std::io::{self, Write};
use std::process::Command;

use anyhow::{bail, Context, Result};

use guru_core::Article;

const FALLBACK_EDITOR: &str = "vi";

const SYNTAX_HINT: &str =
    "<!-- Blank lines separate blocks: ## heading, ### subheading, > quote, - list item, ![caption](url) -->";

/// Comment header written above the body
pub fn draft_header(article: &Article, is_new: bool) -> String {
    let action = if is_new { "New article" } else { "Editing" };
    format!(
        "<!-- {}: {} ({}) -->\n{}\n\n",
        action, article.title, article.slug, SYNTAX_HINT
    )
}

/// Drop the `<!-- ... -->` header lines and surrounding whitespace
pub fn strip_hints(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with("<!--"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Open the article body in the user's editor and return the edited body
pub fn edit_body(article: &Article, is_new: bool) -> Result<String> {
    let (program, args) = editor_command();

    let mut draft = tempfile::Builder::new()
        .prefix(&format!("guru-{}-", article.slug))
        .suffix(".md")
        .tempfile()
        .context("Failed to create draft file")?;
    draft
        .write_all(draft_header(article, is_new).as_bytes())
        .and_then(|_| draft.write_all(article.content.as_bytes()))
        .and_then(|_| draft.flush())
        .context("Failed to write draft file")?;

    let status = Command::new(&program)
        .args(&args)
        .arg(draft.path())
        .status()
        .with_context(|| format!("Failed to run editor: {}", program))?;
    if !status.success() {
        bail!(
            "Editor '{}' exited with {}; article left unchanged. Set $EDITOR to a working editor.",
            program,
            status
        );
    }

    let edited = std::fs::read_to_string(draft.path()).context("Failed to read draft file")?;
    Ok(strip_hints(&edited))
}

/// Resolve the editor program and its leading arguments
fn editor_command() -> (String, Vec<String>) {
    ["EDITOR", "VISUAL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|value| parse_editor(&value))
        .unwrap_or_else(|| (FALLBACK_EDITOR.to_string(), Vec::new()))
}

/// Split values such as `code --wait` into program and arguments
fn parse_editor(value: &str) -> Option<(String, Vec<String>)> {
    let mut parts = value.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// Whether stdin is attached to a terminal
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Ask before deleting; without a terminal the answer is no
pub fn confirm_delete(article: &Article) -> Result<bool> {
    if !is_interactive() {
        return Ok(false);
    }

    println!("Delete article: {} - {}", article.slug, article.title);
    print!("This removes it from the cloud. Continue? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_stripped_from_draft() {
        let mut article = Article::with_id("a1", "Blue Lagoon");
        article.content = "## Arrival\n\nSteam over the water.".to_string();

        let draft = format!("{}{}\n", draft_header(&article, false), article.content);
        assert!(draft.starts_with("<!-- Editing: Blue Lagoon (blue-lagoon) -->"));
        assert_eq!(strip_hints(&draft), article.content);
    }

    #[test]
    fn test_new_article_header() {
        let article = Article::with_id("a1", "Blue Lagoon");
        let header = draft_header(&article, true);
        assert!(header.starts_with("<!-- New article: Blue Lagoon"));
        assert_eq!(strip_hints(&header), "");
    }

    #[test]
    fn test_parse_editor() {
        assert_eq!(
            parse_editor("code --wait"),
            Some(("code".to_string(), vec!["--wait".to_string()]))
        );
        assert_eq!(parse_editor("nano"), Some(("nano".to_string(), Vec::new())));
        assert_eq!(parse_editor("   "), None);
    }
}
