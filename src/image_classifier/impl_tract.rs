use crate::classification::error::ClassifyError;
use crate::classification::verdict::ProbabilityVector;
use crate::image_classifier::interface::ImageClassifier;
use crate::image_classifier::models::model_config::ModelConfig;
use crate::image_classifier::tract::image::{resize_image_to_tensor, softmax, Normalization};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::{Arc, Mutex};
use tract_onnx::prelude::*;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

pub struct ImageClassifierTract {
    model: Mutex<Option<Plan>>,
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTract {
    pub fn new(config: ModelConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            model: Mutex::new(None),
            config,
            logger: logger.with_namespace("image_classifier").with_namespace("tract"),
        }
    }

    fn build_plan(&self) -> TractResult<Plan> {
        let (height, width) = self.config.input_shape;
        tract_onnx::onnx()
            .model_for_path(&self.config.onnx_model_path)?
            .with_input_fact(
                0,
                f32::fact([1, 3, height as usize, width as usize]).into(),
            )?
            .into_optimized()?
            .into_runnable()
    }

    /// Flattens the output and drops the background class of 1001-way models.
    fn to_scores(&self, output: &Tensor) -> Result<Vec<f32>, ClassifyError> {
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| ClassifyError::InferenceFailure(e.to_string()))?;
        let mut scores: Vec<f32> = view.iter().copied().collect();

        if scores.len() == self.config.output_len + 1 {
            scores.remove(0);
        }
        if scores.len() != self.config.output_len {
            return Err(ClassifyError::InferenceFailure(format!(
                "expected {} outputs, model produced {}",
                self.config.output_len,
                scores.len()
            )));
        }

        if self.config.apply_softmax {
            scores = softmax(&scores);
        }
        Ok(scores)
    }
}

impl ImageClassifier for ImageClassifierTract {
    fn load(&self) -> Result<(), ClassifyError> {
        let _ = self
            .logger
            .info(&format!("Loading model {}", self.config.onnx_model_path));

        let plan = self
            .build_plan()
            .map_err(|e| ClassifyError::ModelUnavailable(e.to_string()))?;

        let mut model = self
            .model
            .lock()
            .map_err(|e| ClassifyError::ModelUnavailable(e.to_string()))?;
        *model = Some(plan);

        let _ = self.logger.info("Model loaded");
        Ok(())
    }

    fn output_len(&self) -> usize {
        self.config.output_len
    }

    fn classify(&self, image: &DynamicImage) -> Result<ProbabilityVector, ClassifyError> {
        let model = self
            .model
            .lock()
            .map_err(|e| ClassifyError::InferenceFailure(e.to_string()))?;
        let plan = model
            .as_ref()
            .ok_or_else(|| ClassifyError::ModelUnavailable("model not loaded".to_string()))?;

        let (height, width) = self.config.input_shape;
        let input = resize_image_to_tensor(image, width, height, Normalization::IMAGENET);

        // input and output tensors are dropped when this call returns
        let outputs = plan
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| ClassifyError::InferenceFailure(e.to_string()))?;
        let output = outputs.first().ok_or_else(|| {
            ClassifyError::InferenceFailure("model produced no output".to_string())
        })?;

        let scores = self.to_scores(output)?;
        ProbabilityVector::new(scores)
    }
}
