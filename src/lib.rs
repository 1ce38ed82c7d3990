mod archive;
mod block;
mod config;
mod html;
mod parser;

pub use archive::{Archive, ArchiveError};
pub use block::{Block, Span};
pub use config::{Config, ConfigError, RenderConfig, Theme};
pub use html::build_document;

/// Parse LLM-generated text into a vector of blocks.
pub fn parse(text: &str) -> Vec<Block> {
    parser::parse(text)
}

/// Convert text to an HTML fragment using default render settings.
pub fn render_fragment(text: &str) -> String {
    render_fragment_with_config(text, &RenderConfig::default())
}

/// Convert text to an HTML fragment with custom render settings.
pub fn render_fragment_with_config(text: &str, config: &RenderConfig) -> String {
    let blocks = parse(text);
    html::blocks_to_html(&blocks, config)
}

/// Convert text to a complete HTML document with the given theme.
pub fn markdown_to_html(text: &str, theme: &Theme) -> String {
    build_document(&render_fragment(text), theme)
}

/// Convert text to a complete HTML document using the configured default theme.
pub fn markdown_to_html_with_config(text: &str, config: &Config) -> Result<String, ConfigError> {
    let theme = config.default_theme()?;
    let fragment = render_fragment_with_config(text, &config.render);
    Ok(build_document(&fragment, theme))
}
