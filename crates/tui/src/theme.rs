use ratatui::style::Color;

pub struct Theme {
    pub accent: Color,
    pub error: Color,
    pub label: Color,
    pub border_focus: Color,
    pub border_inactive: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
}

pub const THEME: Theme = Theme {
    accent: Color::Rgb(255, 94, 58),
    error: Color::Red,
    label: Color::Gray,
    border_focus: Color::Cyan,
    border_inactive: Color::DarkGray,
    selected_fg: Color::Black,
    selected_bg: Color::Cyan,
};
