pub mod locale;
pub mod settings;

pub use locale::{Locale, Message};
pub use settings::Settings;
