use claimcheck_client::BannerCategory;
use ratatui::style::{Color, Modifier, Style};

pub fn title() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn banner(category: BannerCategory) -> Style {
    let fg = match category {
        BannerCategory::Real => Color::Green,
        BannerCategory::Fake => Color::Red,
        BannerCategory::Unverified => Color::Yellow,
        BannerCategory::Default => Color::Gray,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

pub fn heading() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn value() -> Style {
    Style::default().fg(Color::White)
}

pub fn link() -> Style {
    Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::UNDERLINED)
}

pub fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn error() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_colour_follows_category() {
        assert_eq!(banner(BannerCategory::Real).fg, Some(Color::Green));
        assert_eq!(banner(BannerCategory::Fake).fg, Some(Color::Red));
        assert_eq!(banner(BannerCategory::Unverified).fg, Some(Color::Yellow));
        assert_eq!(banner(BannerCategory::Default).fg, Some(Color::Gray));
    }
}
