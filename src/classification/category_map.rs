use crate::classification::error::{ClassifyError, ConfigError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialType {
    Paper,
    Plastic,
    Glass,
    Metal,
}

impl MaterialType {
    pub const ALL: [MaterialType; 4] = [
        MaterialType::Paper,
        MaterialType::Plastic,
        MaterialType::Glass,
        MaterialType::Metal,
    ];
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MaterialType::Paper => "Paper",
            MaterialType::Plastic => "Plastic",
            MaterialType::Glass => "Glass",
            MaterialType::Metal => "Metal",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    pub class_index: usize,
    pub material_type: MaterialType,
    pub display_name: String,
    pub weight: f32,
}

impl ClassificationEntry {
    pub fn new(
        class_index: usize,
        material_type: MaterialType,
        display_name: &str,
        weight: f32,
    ) -> Self {
        Self {
            class_index,
            material_type,
            display_name: display_name.to_string(),
            weight,
        }
    }
}

/// Association between classifier output indices and material types.
///
/// Entries keep their declaration order. That order is the tie-break when two
/// material types reach the same score, so it is part of the map's meaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryMap {
    entries: Vec<ClassificationEntry>,
}

impl CategoryMap {
    pub fn new(entries: Vec<ClassificationEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyCategoryMap);
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !(entry.weight > 0.0 && entry.weight <= 1.0) {
                return Err(ConfigError::InvalidWeight {
                    class_index: entry.class_index,
                    weight: entry.weight,
                });
            }
            if !seen.insert(entry.class_index) {
                return Err(ConfigError::DuplicateClassIndex(entry.class_index));
            }
        }

        for material_type in MaterialType::ALL {
            if !entries.iter().any(|entry| entry.material_type == material_type) {
                return Err(ConfigError::MissingMaterialType(material_type));
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ClassificationEntry] {
        &self.entries
    }

    pub fn max_class_index(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.class_index)
            .max()
            .unwrap_or(0)
    }

    pub fn required_vector_len(&self) -> usize {
        self.max_class_index() + 1
    }

    /// Material types in the order they are first declared.
    pub fn material_types(&self) -> Vec<MaterialType> {
        let mut types = Vec::new();
        for entry in &self.entries {
            if !types.contains(&entry.material_type) {
                types.push(entry.material_type);
            }
        }
        types
    }

    /// Fails when the classifier cannot provide every mapped index.
    pub fn validate_output_len(&self, output_len: usize) -> Result<(), ClassifyError> {
        if output_len < self.required_vector_len() {
            return Err(ClassifyError::IndexOutOfRange {
                class_index: self.max_class_index(),
                vector_len: output_len,
            });
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for CategoryMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<ClassificationEntry>::deserialize(deserializer)?;
        CategoryMap::new(entries).map_err(serde::de::Error::custom)
    }
}

/// Table over the 1000-class ImageNet label space.
impl Default for CategoryMap {
    fn default() -> Self {
        use MaterialType::*;

        Self {
            entries: vec![
                ClassificationEntry::new(676, Paper, "Paper bag", 0.9),
                ClassificationEntry::new(549, Paper, "Envelope", 0.9),
                ClassificationEntry::new(478, Paper, "Carton", 0.8),
                ClassificationEntry::new(671, Plastic, "Plastic bottle", 0.9),
                ClassificationEntry::new(898, Plastic, "Water bottle", 0.9),
                ClassificationEntry::new(737, Plastic, "Pop bottle", 0.8),
                ClassificationEntry::new(728, Plastic, "Plastic bag", 0.7),
                ClassificationEntry::new(440, Glass, "Beer bottle", 0.9),
                ClassificationEntry::new(907, Glass, "Wine bottle", 0.9),
                ClassificationEntry::new(441, Glass, "Beer glass", 0.7),
                ClassificationEntry::new(609, Metal, "Tin can", 0.9),
                ClassificationEntry::new(567, Metal, "Frying pan", 0.6),
            ],
        }
    }
}
