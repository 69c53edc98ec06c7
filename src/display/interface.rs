use std::error::Error;

pub const NUM_LINES: usize = 2;
pub const CHARS_PER_LINE: usize = 20;

/// Background hint for the verdict panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Recyclable,
    NotRecyclable,
    Failure,
}

/// A 20x2 character panel.
pub trait Display: Send + Sync {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Returns an error if `line` is not 0 or 1. Text past 20 chars is cut.
    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn set_tone(&mut self, tone: Tone) -> Result<(), Box<dyn Error + Send + Sync>>;
}

pub type Buffer = [[char; CHARS_PER_LINE]; NUM_LINES];

pub fn blank_buffer() -> Buffer {
    [[' '; CHARS_PER_LINE]; NUM_LINES]
}

pub fn write_into(
    buffer: &mut Buffer,
    line: u8,
    text: &str,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let row = buffer
        .get_mut(line as usize)
        .ok_or("Invalid line number")?;

    *row = [' '; CHARS_PER_LINE];
    for (i, c) in text.chars().take(CHARS_PER_LINE).enumerate() {
        row[i] = c;
    }
    Ok(())
}
