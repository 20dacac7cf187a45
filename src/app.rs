use crate::config::Config;
use crate::error::{Result, RiceIntelError};
use crate::logic::AdvisoryEngine;
use crate::ml::IrrigationClassifier;
use crate::models::{Advice, ChatTurn, Feature, Reading, Transcript, Verdict};
use crate::report::{self, ReportInput};
use std::path::PathBuf;

pub const WELCOME_MESSAGE: &str = "Hello! I am Rice Intel. Ask me about your crop conditions \
     (temperature, pH, humidity, moisture, irrigation, fertilizer, pests).";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(Feature),
    Chat,
}

impl Focus {
    pub fn next(&self) -> Self {
        match self {
            Focus::Field(Feature::Moisture) => Focus::Chat,
            Focus::Field(f) => Focus::Field(f.next()),
            Focus::Chat => Focus::Field(Feature::Temperature),
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Focus::Field(Feature::Temperature) => Focus::Chat,
            Focus::Field(f) => Focus::Field(f.prev()),
            Focus::Chat => Focus::Field(Feature::Moisture),
        }
    }
}

/// Raw text of the four reading fields.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    fields: [String; 4],
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, feature: Feature) -> &str {
        &self.fields[feature.index()]
    }

    #[cfg(test)]
    pub fn set(&mut self, feature: Feature, value: impl Into<String>) {
        self.fields[feature.index()] = value.into();
    }

    pub fn push(&mut self, feature: Feature, c: char) {
        self.fields[feature.index()].push(c);
    }

    pub fn pop(&mut self, feature: Feature) {
        self.fields[feature.index()].pop();
    }

    pub fn parse(&self) -> Result<Reading> {
        Reading::parse(
            self.value(Feature::Temperature),
            self.value(Feature::Humidity),
            self.value(Feature::Ph),
            self.value(Feature::Moisture),
        )
    }
}

pub struct ChatState {
    pub input: String,
    /// Lines scrolled up from the bottom of the transcript
    pub scroll: u16,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            scroll: 0,
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

pub struct App {
    pub should_quit: bool,
    pub focus: Focus,
    pub report_dir: PathBuf,

    // Services
    pub classifier: IrrigationClassifier,
    pub engine: AdvisoryEngine,

    // Data
    pub snapshot: Option<Reading>,
    pub verdict: Option<Verdict>,
    pub transcript: Transcript,

    // UI state
    pub form: FormState,
    pub chat: ChatState,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    /// Set when Analyze rejects the form, cleared by the next edit.
    pub form_invalid: bool,
}

impl App {
    pub fn new(
        config: &Config,
        classifier: IrrigationClassifier,
        report_dir: PathBuf,
    ) -> Result<Self> {
        let engine = AdvisoryEngine::new(config.advisory.thresholds()?);

        let mut transcript = Transcript::new();
        transcript.push(ChatTurn::bot(WELCOME_MESSAGE));

        Ok(Self {
            should_quit: false,
            focus: Focus::Field(Feature::Temperature),
            report_dir,
            classifier,
            engine,
            snapshot: None,
            verdict: None,
            transcript,
            form: FormState::new(),
            chat: ChatState::new(),
            status_message: None,
            status_is_error: false,
            form_invalid: false,
        })
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    /// Parse the form and classify it. On invalid input the snapshot and
    /// verdict are left untouched.
    pub fn analyze(&mut self) -> Result<&Verdict> {
        let reading = match self.form.parse() {
            Ok(r) => r,
            Err(e) => {
                self.set_error(&e.to_string());
                self.form_invalid = true;
                return Err(e);
            }
        };
        self.form_invalid = false;

        let verdict = self.classifier.predict(&reading);
        tracing::info!("Analyzed {:?}: {}", reading, verdict);

        self.set_status(&verdict.to_string());
        self.snapshot = Some(reading);
        Ok(&*self.verdict.insert(verdict))
    }

    /// Type into the focused box.
    pub fn insert_char(&mut self, c: char) {
        self.after_edit();
        match self.focus {
            Focus::Field(feature) => self.form.push(feature, c),
            Focus::Chat => self.chat.input.push(c),
        }
    }

    pub fn delete_char(&mut self) {
        self.after_edit();
        match self.focus {
            Focus::Field(feature) => self.form.pop(feature),
            Focus::Chat => {
                self.chat.input.pop();
            }
        }
    }

    fn after_edit(&mut self) {
        self.form_invalid = false;
        if self.status_is_error {
            self.clear_status();
        }
    }

    /// Send the chat input to the advisor. Blank input is ignored.
    pub fn send_chat(&mut self) -> Option<Advice> {
        let query = std::mem::take(&mut self.chat.input);
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        self.transcript.push(ChatTurn::user(query));
        let advice = self
            .engine
            .respond(self.snapshot.as_ref(), query, &self.classifier);
        self.transcript.push(ChatTurn::answer(&advice));
        self.chat.scroll = 0;

        if advice.ends_conversation() {
            self.quit();
        }
        Some(advice)
    }

    pub fn export_report(&mut self) -> Result<PathBuf> {
        let input = ReportInput {
            snapshot: self.snapshot.as_ref(),
            verdict: self.verdict.as_ref(),
            transcript: &self.transcript,
        };
        match report::export(&input, &self.engine, &self.classifier, &self.report_dir) {
            Ok(path) => {
                self.set_status(&format!("Report saved to {}", path.display()));
                Ok(path)
            }
            Err(e) => {
                let message = match &e {
                    RiceIntelError::NoData(_) => {
                        "No data yet - analyze conditions before exporting".to_string()
                    }
                    other => format!("Report failed: {}", other),
                };
                self.set_error(&message);
                Err(e)
            }
        }
    }

    pub fn accuracy_percent(&self) -> f64 {
        self.classifier.accuracy() * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::logic::rules::engine::NO_READINGS_MESSAGE;
    use crate::models::{Dataset, Speaker, TrainingRecord};

    fn classifier() -> IrrigationClassifier {
        let records = (0..60)
            .map(|i| {
                let moisture = 10.0 + i as f64;
                let label = if moisture < 40.0 { "yes" } else { "no" };
                TrainingRecord::new(Reading::new(30.0, 60.0, 6.5, moisture), label)
            })
            .collect();
        let config = ModelConfig {
            n_estimators: 20,
            learning_rate: 0.3,
            ..ModelConfig::default()
        };
        IrrigationClassifier::train(&Dataset::from_records(records), &config).unwrap()
    }

    fn app() -> App {
        let dir = std::env::temp_dir().join("riceintel-app-tests");
        App::new(&Config::default(), classifier(), dir).unwrap()
    }

    fn fill(app: &mut App, values: [&str; 4]) {
        for (feature, value) in Feature::ALL.into_iter().zip(values) {
            app.form.set(feature, value);
        }
    }

    #[test]
    fn starts_with_welcome_and_no_snapshot() {
        let app = app();
        assert!(app.snapshot.is_none());
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript.turns()[0].speaker, Speaker::Bot);
    }

    #[test]
    fn analyze_stores_snapshot_and_verdict() {
        let mut app = app();
        fill(&mut app, ["30", "60", "6.5", "15"]);
        let label = app.analyze().unwrap().label.clone();
        assert_eq!(label, "yes");
        assert_eq!(app.snapshot, Some(Reading::new(30.0, 60.0, 6.5, 15.0)));
    }

    #[test]
    fn invalid_input_leaves_snapshot_unchanged() {
        let mut app = app();
        fill(&mut app, ["30", "60", "6.5", "15"]);
        app.analyze().unwrap();
        let before = app.snapshot;

        app.form.set(Feature::Humidity, "humid");
        assert!(app.analyze().is_err());
        assert_eq!(app.snapshot, before);
        assert!(app.status_is_error);
    }

    #[test]
    fn chat_before_analyze_asks_for_readings() {
        let mut app = app();
        app.chat.input = "what about moisture?".into();
        let advice = app.send_chat().unwrap();
        assert_eq!(advice.message, NO_READINGS_MESSAGE);
        assert_eq!(app.transcript.len(), 3);
        assert!(app.chat.input.is_empty());
    }

    #[test]
    fn blank_chat_ignored() {
        let mut app = app();
        app.chat.input = "   ".into();
        assert!(app.send_chat().is_none());
        assert_eq!(app.transcript.len(), 1);
    }

    #[test]
    fn farewell_quits_after_analyze() {
        let mut app = app();
        fill(&mut app, ["30", "60", "6.5", "15"]);
        app.analyze().unwrap();
        app.chat.input = "bye".into();
        app.send_chat();
        assert!(app.should_quit);
    }

    #[test]
    fn farewell_before_analyze_keeps_running() {
        let mut app = app();
        app.chat.input = "bye".into();
        let advice = app.send_chat().unwrap();
        assert_eq!(advice.message, NO_READINGS_MESSAGE);
        assert!(!app.should_quit);
    }

    #[test]
    fn bot_turns_record_topic() {
        let mut app = app();
        fill(&mut app, ["30", "60", "6.5", "15"]);
        app.analyze().unwrap();
        app.chat.input = "ph?".into();
        app.send_chat();
        let last = &app.transcript.turns()[app.transcript.len() - 1];
        assert_eq!(last.topic, Some(crate::models::Topic::Ph));
    }

    #[test]
    fn any_edit_clears_invalid_form() {
        let mut app = app();
        fill(&mut app, ["30", "humid", "6.5", "15"]);
        assert!(app.analyze().is_err());
        assert!(app.form_invalid);

        app.focus = Focus::Field(Feature::Humidity);
        app.delete_char();
        assert!(!app.form_invalid);
        assert!(!app.status_is_error);
        assert_eq!(app.form.value(Feature::Humidity), "humi");

        assert!(app.analyze().is_err());
        app.insert_char('d');
        assert!(!app.form_invalid);
    }

    #[test]
    fn typing_goes_to_focused_box() {
        let mut app = app();
        app.focus = Focus::Chat;
        app.insert_char('h');
        app.insert_char('i');
        app.delete_char();
        assert_eq!(app.chat.input, "h");
        assert_eq!(app.form.value(Feature::Temperature), "");
    }

    #[test]
    fn report_without_snapshot_sets_error() {
        let mut app = app();
        assert!(matches!(app.export_report(), Err(RiceIntelError::NoData(_))));
        assert!(app.status_is_error);
        assert!(!app.form_invalid);
    }

    #[test]
    fn focus_cycles_through_form_and_chat() {
        let mut focus = Focus::Field(Feature::Temperature);
        for _ in 0..5 {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Field(Feature::Temperature));
        assert_eq!(Focus::Field(Feature::Temperature).prev(), Focus::Chat);
    }
}
