mod feeders;
mod input;
mod styles;
mod tui;
mod view;

pub use feeders::spawn_tui_feeders;
pub use tui::{TuiActor, TuiMsg};
