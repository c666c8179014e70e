//! JSON syntax highlighting: converts pretty-printed JSON into ratatui
//! `Text` coloured with syntect's bundled JSON grammar.

use std::sync::LazyLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";

/// Highlight `json` line by line. Falls back to plain white text when the
/// grammar or theme is unavailable or a line fails to highlight.
pub fn highlight_json(json: &str) -> Text<'static> {
    let syntax = SYNTAX_SET.find_syntax_by_extension("json");
    let theme = THEME_SET.themes.get(THEME);

    let (Some(syntax), Some(theme)) = (syntax, theme) else {
        return plain(json);
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(json) {
        let Ok(ranges) = highlighter.highlight_line(line, &SYNTAX_SET) else {
            log::debug!("JSON highlighting failed, falling back to plain text");
            return plain(json);
        };
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .filter_map(|(hl_style, frag)| {
                let content = frag.trim_end_matches('\n').replace('\t', "    ");
                if content.is_empty() {
                    return None;
                }
                let fg = Color::Rgb(
                    hl_style.foreground.r,
                    hl_style.foreground.g,
                    hl_style.foreground.b,
                );
                Some(Span::styled(content, Style::default().fg(fg)))
            })
            .collect();
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}

fn plain(json: &str) -> Text<'static> {
    let style = Style::default().fg(Color::White);
    Text::from(
        json.lines()
            .map(|line| Line::from(Span::styled(line.to_owned(), style)))
            .collect::<Vec<_>>(),
    )
}
