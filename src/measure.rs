use unicode_width::UnicodeWidthStr;

pub const DEFAULT_CHAR_WIDTH: f64 = 7.0;

/// Maps a label to its rendered width in pixels.
pub trait TextWidth {
    fn text_width(&self, s: &str) -> f64;
}

impl<F> TextWidth for F
where
    F: Fn(&str) -> f64,
{
    fn text_width(&self, s: &str) -> f64 {
        self(s)
    }
}

/// Fixed-pitch measurer: terminal display columns times a character width.
#[derive(Debug, Clone, Copy)]
pub struct DisplayWidth {
    pub char_width: f64,
}

impl Default for DisplayWidth {
    fn default() -> Self {
        Self {
            char_width: DEFAULT_CHAR_WIDTH,
        }
    }
}

impl TextWidth for DisplayWidth {
    fn text_width(&self, s: &str) -> f64 {
        display_width(s) as f64 * self.char_width
    }
}

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}
