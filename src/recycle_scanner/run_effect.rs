use crate::classification::error::ClassifyError;
use crate::classification::verdict::{evaluate, Verdict};
use crate::config::Config;
use crate::image_classifier::interface::ImageClassifier;
use crate::image_classifier::tract::image::decode_image;
use crate::image_source::interface::{ImageSource, ImageUpload};
use crate::library::logger::interface::Logger;
use crate::recycle_scanner::core::{Effect, Event};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    image_source: Arc<dyn ImageSource + Send + Sync>,
    image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    event_sender: Sender<Event>,
}

/// Loads the model and checks the category map against its output size.
pub fn load_model(
    config: &Config,
    image_classifier: &dyn ImageClassifier,
) -> Result<(), ClassifyError> {
    image_classifier.load()?;
    config
        .category_map
        .validate_output_len(image_classifier.output_len())
}

/// Decode, infer, decide. Any failure leaves no partial verdict behind.
pub fn classify_upload(
    config: &Config,
    image_classifier: &dyn ImageClassifier,
    upload: &ImageUpload,
) -> Result<Verdict, ClassifyError> {
    let image = decode_image(&upload.bytes)?;
    let vector = image_classifier.classify(&image)?;
    evaluate(&vector, &config.category_map, &config.verdict_policy)
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        image_source: Arc<dyn ImageSource + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        event_sender: Sender<Event>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("effect"),
            image_source,
            image_classifier,
            event_sender,
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::LoadModel => {
                let loaded = load_model(&self.config, self.image_classifier.as_ref());
                if let Err(e) = &loaded {
                    let _ = self.logger.error(&format!("Model load failed: {}", e));
                }
                let _ = self.event_sender.send(Event::ModelLoadDone(loaded));
            }
            Effect::SubscribeToImages => {
                let events = self.image_source.events();
                while let Ok(event) = events.recv() {
                    if self.event_sender.send(Event::ImageSource(event)).is_err() {
                        return;
                    }
                }
            }
            Effect::SubscribeTick => loop {
                std::thread::sleep(self.config.tick_rate);
                if self.event_sender.send(Event::Tick(Instant::now())).is_err() {
                    return;
                }
            },
            Effect::ClassifyImage { request_id, upload } => {
                let result =
                    classify_upload(&self.config, self.image_classifier.as_ref(), &upload);
                match &result {
                    Ok(verdict) => {
                        let _ = self.logger.info(&format!(
                            "{}: recyclable={} material={:?} confidence={:.1}%",
                            upload.name,
                            verdict.recyclable(),
                            verdict.material_type,
                            verdict.confidence_percent
                        ));
                    }
                    Err(e) => {
                        let _ = self
                            .logger
                            .error(&format!("Unable to classify {}: {}", upload.name, e));
                    }
                }
                let _ = self
                    .event_sender
                    .send(Event::ClassifyDone { request_id, result });
            }
        }
    }
}
