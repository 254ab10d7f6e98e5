use std::io::{self, IsTerminal};

use nu_ansi_term::Color;

pub mod catppuccin {
    use nu_ansi_term::Color;
    pub struct Mocha;
    impl Mocha {
        pub const SURFACE2: Color = Color::Rgb(108, 112, 134);  // Subtle dim
        pub const RED: Color = Color::Rgb(243, 139, 168);
        pub const YELLOW: Color = Color::Rgb(249, 226, 175);
        pub const TEAL: Color = Color::Rgb(148, 226, 213);
    }
}

/// Colour `text` for stderr, or leave it plain when stderr is not a terminal.
pub fn paint_stderr(color: Color, text: &str) -> String {
    if io::stderr().is_terminal() {
        color.paint(text).to_string()
    } else {
        text.to_string()
    }
}
