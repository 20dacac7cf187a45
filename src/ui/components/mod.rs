pub mod chat;
pub mod gauge;
pub mod input;

pub use chat::ChatWidget;
pub use gauge::reading_gauge;
pub use input::InputWidget;
