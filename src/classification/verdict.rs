use crate::classification::category_map::{CategoryMap, MaterialType};
use crate::classification::error::ClassifyError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCEPTANCE_THRESHOLD: f32 = 0.01;

/// Raw per-class output of the image classifier, every value in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityVector(Vec<f32>);

impl ProbabilityVector {
    pub fn new(values: Vec<f32>) -> Result<Self, ClassifyError> {
        for (index, &value) in values.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ClassifyError::InvalidProbability { index, value });
            }
        }
        Ok(Self(values))
    }

    pub fn get(&self, class_index: usize) -> Result<f32, ClassifyError> {
        self.0
            .get(class_index)
            .copied()
            .ok_or(ClassifyError::IndexOutOfRange {
                class_index,
                vector_len: self.0.len(),
            })
    }
}

#[cfg(test)]
impl ProbabilityVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightMode {
    /// Weights are carried in the map but do not touch the score.
    #[default]
    Ignore,
    /// Raw probability is multiplied by the entry weight before aggregation.
    Multiply,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerdictPolicy {
    pub acceptance_threshold: f32,
    #[serde(default)]
    pub weight_mode: WeightMode,
}

impl Default for VerdictPolicy {
    fn default() -> Self {
        Self {
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            weight_mode: WeightMode::default(),
        }
    }
}

/// Best probability seen per material type, in first-declared order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialScore {
    scores: Vec<(MaterialType, f32)>,
}

impl MaterialScore {
    pub fn record(&mut self, material_type: MaterialType, probability: f32) {
        match self.scores.iter_mut().find(|(t, _)| *t == material_type) {
            Some((_, score)) => *score = score.max(probability),
            None => self.scores.push((material_type, probability)),
        }
    }

    /// Highest score; on a tie the type declared first wins.
    pub fn best(&self) -> Option<(MaterialType, f32)> {
        let mut best: Option<(MaterialType, f32)> = None;
        for &(material_type, score) in &self.scores {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((material_type, score)),
            }
        }
        best
    }
}

#[cfg(test)]
impl MaterialScore {
    pub fn get(&self, material_type: MaterialType) -> Option<f32> {
        self.scores
            .iter()
            .find(|(t, _)| *t == material_type)
            .map(|(_, score)| *score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub material_type: Option<MaterialType>,
    pub confidence_percent: f32,
}

impl Verdict {
    pub fn recyclable(&self) -> bool {
        self.material_type.is_some()
    }
}

/// What the presentation layer receives for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Classified(Verdict),
    Unclassifiable(ClassifyError),
}

pub fn score_materials(
    vector: &ProbabilityVector,
    category_map: &CategoryMap,
    weight_mode: WeightMode,
) -> Result<MaterialScore, ClassifyError> {
    let mut material_score = MaterialScore::default();

    for entry in category_map.entries() {
        let probability = vector.get(entry.class_index)?;
        let score = match weight_mode {
            WeightMode::Ignore => probability,
            WeightMode::Multiply => probability * entry.weight,
        };
        material_score.record(entry.material_type, score);
    }

    Ok(material_score)
}

pub fn evaluate(
    vector: &ProbabilityVector,
    category_map: &CategoryMap,
    policy: &VerdictPolicy,
) -> Result<Verdict, ClassifyError> {
    let material_score = score_materials(vector, category_map, policy.weight_mode)?;

    let (material_type, best_score) = match material_score.best() {
        Some((best_type, best_score)) if best_score > policy.acceptance_threshold => {
            (Some(best_type), best_score)
        }
        Some((_, best_score)) => (None, best_score),
        None => (None, 0.0),
    };

    Ok(Verdict {
        material_type,
        confidence_percent: (best_score * 100.0).clamp(0.0, 100.0),
    })
}
