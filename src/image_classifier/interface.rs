use crate::classification::error::ClassifyError;
use crate::classification::verdict::ProbabilityVector;
use image::DynamicImage;

pub trait ImageClassifier {
    /// Loads the model. Must succeed before `classify` is called.
    fn load(&self) -> Result<(), ClassifyError>;

    /// Length of every vector returned by `classify`.
    fn output_len(&self) -> usize;

    fn classify(&self, image: &DynamicImage) -> Result<ProbabilityVector, ClassifyError>;
}
