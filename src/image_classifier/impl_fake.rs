use crate::classification::error::ClassifyError;
use crate::classification::verdict::ProbabilityVector;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use rand::distr::{Distribution, Uniform};
use std::sync::Arc;

/// Puts a random confidence on one of `candidates` and spreads the rest.
pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    output_len: usize,
    candidates: Vec<usize>,
}

impl ImageClassifierFake {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        output_len: usize,
        candidates: Vec<usize>,
    ) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
            output_len,
            candidates: candidates
                .into_iter()
                .filter(|&index| index < output_len)
                .collect(),
        }
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn load(&self) -> Result<(), ClassifyError> {
        let _ = self.logger.info("Model loaded");
        Ok(())
    }

    fn output_len(&self) -> usize {
        self.output_len
    }

    fn classify(&self, image: &DynamicImage) -> Result<ProbabilityVector, ClassifyError> {
        let _ = self.logger.info(&format!(
            "Classifying {}x{} image...",
            image.width(),
            image.height()
        ));

        if self.output_len < 2 {
            return ProbabilityVector::new(vec![1.0; self.output_len]);
        }

        let mut rng = rand::rng();

        let index = if self.candidates.is_empty() {
            Uniform::new(0, self.output_len)
                .map_err(|e| ClassifyError::InferenceFailure(e.to_string()))?
                .sample(&mut rng)
        } else {
            let pick = Uniform::new(0, self.candidates.len())
                .map_err(|e| ClassifyError::InferenceFailure(e.to_string()))?
                .sample(&mut rng);
            self.candidates[pick]
        };

        let confidence = Uniform::new(0.0f32, 1.0)
            .map_err(|e| ClassifyError::InferenceFailure(e.to_string()))?
            .sample(&mut rng);

        let rest = (1.0 - confidence) / (self.output_len - 1) as f32;
        let mut values = vec![rest; self.output_len];
        values[index] = confidence;

        ProbabilityVector::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;

    #[test]
    fn test_fake_output_is_valid() {
        let logger = Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap()));
        let classifier = ImageClassifierFake::new(logger, 1000, vec![671, 5000]);
        let image = DynamicImage::new_rgb8(8, 8);

        for _ in 0..20 {
            let vector = classifier.classify(&image).unwrap();
            assert_eq!(vector.len(), 1000);
        }
    }
}
