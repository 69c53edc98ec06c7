use crate::config::Config;
use crate::display::interface::Display;
use crate::image_classifier::interface::ImageClassifier;
use crate::image_source::interface::ImageSource;
use crate::library::logger::interface::Logger;
use crate::recycle_scanner::core::{init, transition, Effect, Event, State};
use crate::recycle_scanner::render::Render;
use crate::recycle_scanner::run_effect::RunEffect;
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};

pub struct RecycleScanner {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    render: Render,
    run_effect: RunEffect,
    event_receiver: Receiver<Event>,
}

impl RecycleScanner {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        image_source: Arc<dyn ImageSource + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        display: Arc<Mutex<dyn Display + Send + Sync>>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let logger = logger.with_namespace("recycle_scanner");

        Self {
            run_effect: RunEffect::new(
                config.clone(),
                logger.clone(),
                image_source,
                image_classifier,
                event_sender,
            ),
            render: Render::new(display),
            config,
            logger,
            event_receiver,
        }
    }

    fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let run_effect = self.run_effect.clone();
            std::thread::spawn(move || run_effect.run_effect(effect));
        }
    }

    /// Runs until the image source closes, or fails on a configuration error.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (mut state, effects) = init();
        self.render.render(&state)?;
        self.spawn_effects(effects);

        loop {
            let event = self.event_receiver.recv()?;

            if !matches!(event, Event::Tick(_)) {
                let _ = self.logger.info(&format!(
                    "\nold state:\n\t{:?}\n\nevent:\n\t{:?}",
                    state, event
                ));
            }

            let (new_state, effects) = transition(&self.config, state.clone(), event);

            if new_state != state {
                let _ = self.logger.info(&format!(
                    "\nnew state:\n\t{:?}\n\neffects:\n\t{:?}",
                    new_state, effects
                ));
                self.render.render(&new_state)?;
            }

            state = new_state;
            self.spawn_effects(effects);

            match &state {
                State::Stopped { .. } => {
                    let _ = self.logger.info("Image source closed, stopping");
                    return Ok(());
                }
                State::ModelUnavailable {
                    retryable: false,
                    message,
                    ..
                } => {
                    let _ = self.logger.error(&format!("Cannot classify: {}", message));
                    return Err(message.clone().into());
                }
                _ => {}
            }
        }
    }
}
