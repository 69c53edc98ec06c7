use crate::classification::verdict::ClassificationOutcome;
use crate::display::interface::{Display, Tone};
use crate::recycle_scanner::core::{Shown, State};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Render {
    display: Arc<Mutex<dyn Display + Send + Sync>>,
}

/// Two panel lines and a tone for one outcome.
pub fn outcome_lines(shown: &Shown) -> (String, String, Tone) {
    match &shown.outcome {
        ClassificationOutcome::Classified(verdict) => match verdict.material_type {
            Some(material_type) => (
                "Recyclable".to_string(),
                format!("{} {:.1}%", material_type, verdict.confidence_percent),
                Tone::Recyclable,
            ),
            None => (
                "Not recyclable".to_string(),
                format!("Confidence {:.1}%", verdict.confidence_percent),
                Tone::NotRecyclable,
            ),
        },
        ClassificationOutcome::Unclassifiable(_) => (
            "Unable to classify".to_string(),
            shown.name.clone(),
            Tone::Failure,
        ),
    }
}

impl Render {
    pub fn new(display: Arc<Mutex<dyn Display + Send + Sync>>) -> Self {
        Self { display }
    }

    pub fn render(&self, state: &State) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut display = self.display.lock().map_err(|e| e.to_string())?;

        display.clear()?;

        let (first, second, tone) = match state {
            State::ModelLoading {
                pending: Some(upload),
                ..
            } => (
                "Loading model...".to_string(),
                upload.name.clone(),
                Tone::Neutral,
            ),
            State::ModelLoading { .. } => {
                ("Loading model...".to_string(), String::new(), Tone::Neutral)
            }
            State::ModelUnavailable { retryable, .. } => (
                "Model unavailable".to_string(),
                if *retryable {
                    "Retrying...".to_string()
                } else {
                    "Check category map".to_string()
                },
                Tone::Failure,
            ),
            State::Ready { last: None, .. } => (
                "Ready".to_string(),
                "Submit a photo".to_string(),
                Tone::Neutral,
            ),
            State::Ready { last: Some(shown), .. } | State::Stopped { last: Some(shown) } => {
                outcome_lines(shown)
            }
            State::Classifying { name, .. } => {
                ("Classifying...".to_string(), name.clone(), Tone::Neutral)
            }
            State::Stopped { last: None } => ("Stopped".to_string(), String::new(), Tone::Neutral),
        };

        display.set_tone(tone)?;
        display.write_line(0, &first)?;
        display.write_line(1, &second)?;

        Ok(())
    }
}
