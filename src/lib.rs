pub mod backend;
pub mod gui;
pub mod hotkey;
pub mod logging;
pub mod palette;
pub mod results;
pub mod settings;
pub mod shell;
pub mod visibility;
