use crate::display::interface::{blank_buffer, write_into, Buffer, Display, Tone};
use eframe::egui;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Clone)]
struct VerdictWindow {
    buffer: Arc<Mutex<Buffer>>,
    tone: Arc<Mutex<Tone>>,
}

fn background(tone: Tone) -> egui::Color32 {
    match tone {
        Tone::Neutral => egui::Color32::from_rgb(220, 220, 220),
        Tone::Recyclable => egui::Color32::from_rgb(200, 255, 200),
        Tone::NotRecyclable => egui::Color32::from_rgb(255, 210, 200),
        Tone::Failure => egui::Color32::from_rgb(255, 240, 170),
    }
}

impl eframe::App for VerdictWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let buffer = match self.buffer.lock() {
            Ok(buffer) => *buffer,
            Err(_) => return,
        };
        let tone = self.tone.lock().map(|tone| *tone).unwrap_or_default();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                let rect = ui.available_rect_before_wrap();
                ui.painter().rect_filled(rect, 0.0, background(tone));
                ui.painter().rect_stroke(
                    rect,
                    0.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(100, 100, 100)),
                );

                for row in buffer.iter() {
                    let text: String = row.iter().collect();
                    ui.label(
                        egui::RichText::new(text)
                            .monospace()
                            .color(egui::Color32::BLACK)
                            .size(20.0),
                    );
                }
            });
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(200));
    }
}

pub struct DisplayGui {
    buffer: Arc<Mutex<Buffer>>,
    tone: Arc<Mutex<Tone>>,
}

impl DisplayGui {
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(blank_buffer())),
            tone: Arc::new(Mutex::new(Tone::Neutral)),
        }
    }
}

impl Display for DisplayGui {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let window = VerdictWindow {
            buffer: self.buffer.clone(),
            tone: self.tone.clone(),
        };

        thread::spawn(move || {
            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_inner_size([420.0, 200.0])
                    .with_resizable(false),
                ..Default::default()
            };

            let _ = eframe::run_native(
                "Recycle Scanner",
                options,
                Box::new(|_cc| Box::new(window)),
            );
        });

        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut buffer = self.buffer.lock().map_err(|e| e.to_string())?;
        *buffer = blank_buffer();
        Ok(())
    }

    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut buffer = self.buffer.lock().map_err(|e| e.to_string())?;
        write_into(&mut buffer, line, text)
    }

    fn set_tone(&mut self, tone: Tone) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.tone.lock().map_err(|e| e.to_string())? = tone;
        Ok(())
    }
}
