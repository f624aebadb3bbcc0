use colored::Color;

pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const IPV4_ADDR: Color = Color::TrueColor { r: 135, g: 175, b: 255 };
pub const PORT_OPEN: Color = Color::BrightGreen;
pub const PORT_CLOSED: Color = Color::BrightBlack;
