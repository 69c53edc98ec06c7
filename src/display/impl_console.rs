use crate::display::interface::{blank_buffer, write_into, Buffer, Display, Tone};
use std::error::Error;

pub struct DisplayConsole {
    buffer: Buffer,
    tone: Tone,
}

impl DisplayConsole {
    pub fn new() -> Self {
        Self {
            buffer: blank_buffer(),
            tone: Tone::Neutral,
        }
    }

    fn render(&self) {
        let marker = match self.tone {
            Tone::Neutral => ' ',
            Tone::Recyclable => '+',
            Tone::NotRecyclable => '-',
            Tone::Failure => '!',
        };
        println!("┌────────────────────┐");
        for row in &self.buffer {
            let text: String = row.iter().collect();
            println!("│{}│{}", text, marker);
        }
        println!("└────────────────────┘");
    }
}

impl Display for DisplayConsole {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.render();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer = blank_buffer();
        self.tone = Tone::Neutral;
        Ok(())
    }

    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        write_into(&mut self.buffer, line, text)?;
        self.render();
        Ok(())
    }

    fn set_tone(&mut self, tone: Tone) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.tone = tone;
        Ok(())
    }
}
