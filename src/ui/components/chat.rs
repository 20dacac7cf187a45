use crate::models::{ChatTurn, Speaker};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Conversation pane. Pinned to the newest turn unless scrolled back.
pub struct ChatWidget<'a> {
    turns: &'a [ChatTurn],
    scroll_back: u16,
    focused: bool,
}

impl<'a> ChatWidget<'a> {
    pub fn new(turns: &'a [ChatTurn]) -> Self {
        Self {
            turns,
            scroll_back: 0,
            focused: false,
        }
    }

    pub fn scroll_back(mut self, lines: u16) -> Self {
        self.scroll_back = lines;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

fn speaker_style(speaker: Speaker) -> Style {
    let color = match speaker {
        Speaker::User => Theme::USER,
        Speaker::Bot => Theme::BOT,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Rows a line of `chars` characters takes when wrapped to `width`.
fn wrapped_rows(chars: usize, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    chars.max(1).div_ceil(width)
}

impl Widget for ChatWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Advisor", Theme::header()))
            .borders(Borders::ALL)
            .border_style(if self.focused {
                Theme::border_focused()
            } else {
                Theme::border()
            });

        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let mut rows = 0usize;
        let lines: Vec<Line> = self
            .turns
            .iter()
            .map(|turn| {
                let mut spans = vec![Span::styled(
                    format!("{}: ", turn.speaker),
                    speaker_style(turn.speaker),
                )];
                if let Some(topic) = turn.topic {
                    spans.push(Span::styled(
                        format!("[{}] ", topic),
                        Style::default().fg(topic.color()),
                    ));
                }
                if let Some(severity) = turn.severity {
                    spans.push(Span::styled(
                        format!("{} ", severity.symbol()),
                        Style::default().fg(severity.color()),
                    ));
                }
                spans.push(Span::styled(turn.text.as_str(), Theme::normal()));

                let line = Line::from(spans);
                rows += wrapped_rows(line.width(), width);
                line
            })
            .collect();

        // Row estimate ignores word-boundary wrapping; close enough to pin the tail
        let bottom = rows.saturating_sub(inner.height as usize);
        let offset = bottom.saturating_sub(self.scroll_back as usize);
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((offset, 0))
            .render(inner, buf);
    }
}
