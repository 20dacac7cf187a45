use crate::models::Topic;

#[derive(Debug, Clone, Copy)]
enum Keyword {
    /// Matches anywhere in the query.
    Substring(&'static str),
    /// Matches only a whole word, for keywords short enough to hide inside
    /// other words ("ph" in "phosphorus", "hi" in "which").
    Word(&'static str),
}

impl Keyword {
    fn matches(&self, query: &str) -> bool {
        match self {
            Keyword::Substring(k) => query.contains(k),
            Keyword::Word(k) => query
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == *k),
        }
    }
}

/// Topics in precedence order. The first entry with a matching keyword wins.
const TOPIC_KEYWORDS: &[(Topic, &[Keyword])] = &[
    (
        Topic::Temperature,
        &[
            Keyword::Substring("temperature"),
            Keyword::Word("temp"),
            Keyword::Word("temps"),
        ],
    ),
    (Topic::Humidity, &[Keyword::Substring("humid")]),
    (Topic::Moisture, &[Keyword::Substring("moisture")]),
    (
        Topic::Ph,
        &[Keyword::Word("ph"), Keyword::Substring("acidity"), Keyword::Substring("alkalin")],
    ),
    (
        Topic::Irrigation,
        &[
            Keyword::Substring("irrigat"),
            Keyword::Substring("watering"),
            Keyword::Word("water"),
            Keyword::Word("waters"),
        ],
    ),
    (
        Topic::Fertilizer,
        &[
            Keyword::Substring("fertiliz"),
            Keyword::Substring("fertilis"),
            Keyword::Substring("nutrient"),
            Keyword::Substring("urea"),
        ],
    ),
    (
        Topic::Pest,
        &[
            Keyword::Substring("pest"),
            Keyword::Substring("insect"),
            Keyword::Word("bug"),
            Keyword::Word("bugs"),
        ],
    ),
    (
        Topic::Greeting,
        &[Keyword::Substring("hello"), Keyword::Word("hi"), Keyword::Word("hey")],
    ),
    (
        Topic::Farewell,
        &[Keyword::Substring("bye"), Keyword::Word("exit"), Keyword::Word("quit")],
    ),
];

impl Topic {
    /// Resolve a free-text query to a topic. Unrecognized queries map to
    /// [`Topic::Help`].
    pub fn resolve(query: &str) -> Topic {
        let query = query.trim().to_lowercase();
        TOPIC_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| k.matches(&query)))
            .map(|(topic, _)| *topic)
            .unwrap_or(Topic::Help)
    }
}
