use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 220, b: 140 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
