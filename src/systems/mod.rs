pub mod colors;
pub mod interaction;
pub mod time;
pub mod ui;
