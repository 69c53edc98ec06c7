use crate::image_source::interface::{ImageSource, ImageSourceEvent, ImageUpload};
use crate::library::logger::interface::Logger;
use std::io::BufRead;
use std::sync::Arc;

/// One image file path per line on stdin.
pub struct ImageSourceStdin {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageSourceStdin {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("image_source").with_namespace("stdin"),
        }
    }
}

fn read_upload(path: &str) -> ImageSourceEvent {
    match std::fs::read(path) {
        Ok(bytes) => ImageSourceEvent::Submitted(ImageUpload {
            name: path.to_string(),
            bytes,
        }),
        Err(e) => ImageSourceEvent::Rejected {
            name: path.to_string(),
            reason: e.to_string(),
        },
    }
}

impl ImageSource for ImageSourceStdin {
    fn events(&self) -> std::sync::mpsc::Receiver<ImageSourceEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let logger = self.logger.clone();

        std::thread::spawn(move || {
            let _ = logger.info("Enter an image path per line");
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let path = line.trim();
                if path.is_empty() {
                    continue;
                }
                if tx.send(read_upload(path)).is_err() {
                    return;
                }
            }
            let _ = tx.send(ImageSourceEvent::Closed);
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_rejected() {
        let event = read_upload("./does/not/exist.jpg");

        assert!(matches!(event, ImageSourceEvent::Rejected { .. }));
    }
}
