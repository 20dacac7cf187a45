use serde::{Deserialize, Serialize};

/// What a chat query is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Temperature,
    Humidity,
    Moisture,
    Ph,
    Irrigation,
    Fertilizer,
    Pest,
    Greeting,
    Farewell,
    Help,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Temperature => "Temperature",
            Topic::Humidity => "Humidity",
            Topic::Moisture => "Moisture",
            Topic::Ph => "pH",
            Topic::Irrigation => "Irrigation",
            Topic::Fertilizer => "Fertilizer",
            Topic::Pest => "Pest",
            Topic::Greeting => "Greeting",
            Topic::Farewell => "Farewell",
            Topic::Help => "Help",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            Topic::Temperature => Color::Red,
            Topic::Humidity => Color::Cyan,
            Topic::Moisture => Color::Blue,
            Topic::Ph => Color::Magenta,
            Topic::Irrigation => Color::LightBlue,
            Topic::Fertilizer => Color::Green,
            Topic::Pest => Color::LightRed,
            Topic::Greeting | Topic::Farewell | Topic::Help => Color::Gray,
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Advisory,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Advisory => "Advisory",
            Severity::Warning => "Warning",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            Severity::Info => Color::Green,
            Severity::Advisory => Color::Blue,
            Severity::Warning => Color::Yellow,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Info => "✓",
            Severity::Advisory => "→",
            Severity::Warning => "⚠",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One chatbot answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub topic: Topic,
    pub severity: Severity,
    pub message: String,
}

impl Advice {
    pub fn new(topic: Topic, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            topic,
            severity,
            message: message.into(),
        }
    }

    pub fn info(topic: Topic, message: impl Into<String>) -> Self {
        Self::new(topic, Severity::Info, message)
    }

    /// The front-end should close after showing this answer.
    pub fn ends_conversation(&self) -> bool {
        self.topic == Topic::Farewell
    }
}
