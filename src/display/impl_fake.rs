use crate::display::interface::{blank_buffer, write_into, Buffer, Display, Tone};
use std::error::Error;

/// Keeps what was written so tests can read it back.
#[derive(Default)]
pub struct DisplayFake {
    pub buffer: Option<Buffer>,
    pub tone: Tone,
}

impl DisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, line: usize) -> String {
        self.buffer
            .map(|buffer| buffer[line].iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }
}

impl Display for DisplayFake {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer = Some(blank_buffer());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer = Some(blank_buffer());
        self.tone = Tone::Neutral;
        Ok(())
    }

    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let buffer = self.buffer.get_or_insert_with(blank_buffer);
        write_into(buffer, line, text)
    }

    fn set_tone(&mut self, tone: Tone) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.tone = tone;
        Ok(())
    }
}
