//! Markdown preview rendering.

use pulldown_cmark::{Options, Parser, html};

/// Converts Markdown source to HTML. Implementations must be pure.
pub trait Renderer {
    fn render(&self, source: &str) -> String;
}

/// CommonMark renderer with the GitHub-style extensions notes tend to use.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, source: &str) -> String {
        let parser = Parser::new_ext(source, Self::options());
        let mut out = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}
