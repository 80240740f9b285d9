use console::Style;

/// Named terminal colors available to command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    LightRed,
    LightGreen,
    Yellow,
    LightBlue,
    Magenta,
    LightCyan,
    White,
    #[default]
    Normal,
    Black,
    Red,
    Green,
    Brown,
    Blue,
    Cyan,
    Bold,
    Underscore,
    Reverse,
}

impl Color {
    pub fn style(self) -> Style {
        match self {
            Color::LightRed => Style::new().red().bold(),
            Color::LightGreen => Style::new().green().bold(),
            Color::Yellow => Style::new().yellow().bold(),
            Color::LightBlue => Style::new().blue().bold(),
            Color::Magenta => Style::new().magenta().bold(),
            Color::LightCyan => Style::new().cyan().bold(),
            Color::White => Style::new().white().bold(),
            Color::Normal => Style::new(),
            Color::Black => Style::new().black(),
            Color::Red => Style::new().red(),
            Color::Green => Style::new().green(),
            Color::Brown => Style::new().yellow(),
            Color::Blue => Style::new().blue(),
            Color::Cyan => Style::new().cyan(),
            Color::Bold => Style::new().bold(),
            Color::Underscore => Style::new().underlined(),
            Color::Reverse => Style::new().reverse(),
        }
    }
}

/// Styles `text`, or returns it untouched when colors are off.
pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    color
        .style()
        .force_styling(enabled)
        .apply_to(text)
        .to_string()
}

pub mod names {
    use super::Color;

    pub const ERROR_LABEL: Color = Color::Red;
    pub const TABLE_HEADER: Color = Color::Bold;
    pub const LIST_KEY: Color = Color::Cyan;
}
