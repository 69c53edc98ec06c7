use crate::image_source::interface::{ImageSource, ImageSourceEvent, ImageUpload};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

/// Submits a solid-color PNG every `interval`, and now and then a corrupt file.
pub struct ImageSourceFake {
    logger: Arc<dyn Logger + Send + Sync>,
    interval: Duration,
}

impl ImageSourceFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, interval: Duration) -> Self {
        Self {
            logger: logger.with_namespace("image_source").with_namespace("fake"),
            interval,
        }
    }
}

fn synthetic_png(color: [u8; 3]) -> Result<Vec<u8>, image::ImageError> {
    let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(64, 48, Rgb(color)));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

impl ImageSource for ImageSourceFake {
    fn events(&self) -> std::sync::mpsc::Receiver<ImageSourceEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let logger = self.logger.clone();
        let interval = self.interval;

        std::thread::spawn(move || {
            let mut count: u64 = 0;
            loop {
                std::thread::sleep(interval);
                count += 1;

                let name = format!("upload-{}.png", count);
                let event = if rand::random::<f32>() < 0.1 {
                    ImageSourceEvent::Submitted(ImageUpload {
                        name,
                        bytes: vec![0xde, 0xad, 0xbe, 0xef],
                    })
                } else {
                    match synthetic_png(rand::random::<[u8; 3]>()) {
                        Ok(bytes) => ImageSourceEvent::Submitted(ImageUpload { name, bytes }),
                        Err(e) => ImageSourceEvent::Rejected {
                            name,
                            reason: e.to_string(),
                        },
                    }
                };

                let _ = logger.info(&format!("Submitting {:?}", event));
                if tx.send(event).is_err() {
                    return;
                }
            }
        });

        rx
    }
}
