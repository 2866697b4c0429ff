pub mod config;
pub mod controller;
pub mod document;
pub mod file;
pub mod host;
pub mod registry;
pub mod scanner;
pub mod str_utils;
pub mod tab_size;
pub mod terminal;

pub use config::{ConfigWarning, IndentSize, Settings, WidthMapping};
pub use controller::{EditorUpdate, IndentController};
pub use document::{Document, DocumentId, TextDocument};
pub use host::{EditorId, EditorOptions, Host, HostEvent, MarkerFactory, VisibleEditor};
pub use scanner::IndentRange;
