use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub digit: Color,
    pub arrow: Color,     // Direction changes and branches
    pub operator: Color,  // Arithmetic and stack manipulation
    pub io: Color,        // Input and output
    pub space_op: Color,  // `g`, `p`, `#`
    pub ip_cursor: Color, // Cell under an IP
    pub current_ip: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for status bar
    digit: Color::Rgb(250, 179, 135),          // Orange for literals
    arrow: Color::Rgb(137, 180, 250),          // Blue for flow control
    operator: Color::Rgb(148, 226, 213),       // Cyan/teal for operators
    io: Color::Rgb(245, 194, 231),             // Pink for I/O
    space_op: Color::Rgb(203, 166, 247),       // Mauve for grid access
    ip_cursor: Color::Rgb(180, 165, 120),      // Muted yellow for other IPs
    current_ip: Color::Rgb(249, 226, 175),     // Yellow for the active IP
};
