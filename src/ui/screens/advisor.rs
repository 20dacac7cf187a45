use crate::app::{App, Focus};
use crate::models::Feature;
use crate::ui::components::{reading_gauge, ChatWidget, InputWidget};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// The single screen: reading form, gauges, model verdict and the advisor chat.
pub struct AdvisorScreen<'a> {
    app: &'a App,
}

impl<'a> AdvisorScreen<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for AdvisorScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Length(3), // Reading inputs
                Constraint::Length(4), // Gauges
                Constraint::Length(3), // Verdict
                Constraint::Min(5),    // Chat transcript
                Constraint::Length(3), // Chat input
                Constraint::Length(1), // Status message
                Constraint::Length(1), // Nav bar
            ])
            .split(area);

        self.render_header(chunks[0], buf);
        self.render_inputs(chunks[1], buf);
        self.render_gauges(chunks[2], buf);
        self.render_verdict(chunks[3], buf);

        ChatWidget::new(self.app.transcript.turns())
            .scroll_back(self.app.chat.scroll)
            .focused(self.app.focus == Focus::Chat)
            .render(chunks[4], buf);

        InputWidget::new("Ask the advisor", &self.app.chat.input)
            .placeholder("e.g. what about soil moisture?")
            .focused(self.app.focus == Focus::Chat)
            .render(chunks[5], buf);

        self.render_status_message(chunks[6], buf);
        self.render_nav(chunks[7], buf);
    }
}

impl AdvisorScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let line = Line::from(vec![
            Span::styled("Rice Intel - Field Conditions Analyzer", Theme::title()),
            Span::styled(
                format!("   Model Accuracy: {:.2}%", self.app.accuracy_percent()),
                Theme::dim(),
            ),
        ]);
        Paragraph::new(line).block(block).render(area, buf);
    }

    fn render_inputs(&self, area: Rect, buf: &mut Buffer) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        for (feature, cell) in Feature::ALL.into_iter().zip(cells.iter()) {
            let value = self.app.form.value(feature);
            let invalid = self.app.form_invalid && !is_number(value);
            InputWidget::new(feature.label(), value)
                .focused(self.app.focus == Focus::Field(feature))
                .invalid(invalid)
                .render(*cell, buf);
        }
    }

    fn render_gauges(&self, area: Rect, buf: &mut Buffer) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        let thresholds = self.app.engine.thresholds();
        for (feature, cell) in Feature::ALL.into_iter().zip(cells.iter()) {
            let value = self.app.snapshot.map(|r| r.get(feature));
            reading_gauge(feature, value, thresholds).render(*cell, buf);
        }
    }

    fn render_verdict(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Prediction", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let line = match &self.app.verdict {
            Some(verdict) => {
                let style = if verdict.is_positive() {
                    Theme::warning()
                } else {
                    Theme::success()
                };
                Line::from(vec![
                    Span::styled(verdict.headline(), style),
                    Span::styled(
                        format!("   (accuracy {:.2}%)", verdict.accuracy_percent()),
                        Theme::dim(),
                    ),
                ])
            }
            None => Line::from(Span::styled(
                "Enter readings and press Enter to analyze",
                Theme::dim(),
            )),
        };

        Paragraph::new(line).block(block).render(area, buf);
    }

    fn render_status_message(&self, area: Rect, buf: &mut Buffer) {
        if let Some(msg) = self.app.status_message.as_deref() {
            let style = if self.app.status_is_error {
                Theme::error()
            } else {
                Theme::success()
            };
            Paragraph::new(Span::styled(msg, style)).render(area, buf);
        }
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        let nav = Line::from(vec![
            Span::styled("[Tab]", Theme::nav_key()),
            Span::styled("Next field ", Theme::nav_label()),
            Span::styled("[Enter]", Theme::nav_key()),
            Span::styled("Analyze/Send ", Theme::nav_label()),
            Span::styled("[PgUp/PgDn]", Theme::nav_key()),
            Span::styled("Scroll ", Theme::nav_label()),
            Span::styled("[Ctrl+R]", Theme::nav_key()),
            Span::styled("Report ", Theme::nav_label()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);

        Paragraph::new(nav).render(area, buf);
    }
}

fn is_number(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_check() {
        assert!(is_number(" 6.5 "));
        assert!(is_number("-3"));
        assert!(!is_number(""));
        assert!(!is_number("NaN"));
        assert!(!is_number("humid"));
    }
}
