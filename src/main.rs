use config::{ClassifierKind, Config, DisplayKind, SourceKind};
use display::{impl_console::DisplayConsole, impl_gui::DisplayGui, interface::Display};
use image_classifier::{
    impl_fake::ImageClassifierFake, impl_tract::ImageClassifierTract, interface::ImageClassifier,
};
use image_source::{
    impl_fake::ImageSourceFake, impl_stdin::ImageSourceStdin, interface::ImageSource,
};
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use recycle_scanner::main::RecycleScanner;
use std::sync::{Arc, Mutex};

mod classification;
mod config;
mod display;
mod image_classifier;
mod image_source;
mod library;
mod recycle_scanner;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let image_classifier: Arc<dyn ImageClassifier + Send + Sync> = match config.classifier {
        ClassifierKind::Tract => Arc::new(ImageClassifierTract::new(
            config.model.clone(),
            logger.clone(),
        )),
        ClassifierKind::Fake => Arc::new(ImageClassifierFake::new(
            logger.clone(),
            config.model.output_len,
            config
                .category_map
                .entries()
                .iter()
                .map(|entry| entry.class_index)
                .chain([0, 1, 2])
                .collect(),
        )),
    };

    // A map the classifier cannot satisfy is a configuration bug.
    config
        .category_map
        .validate_output_len(image_classifier.output_len())?;

    let image_source: Arc<dyn ImageSource + Send + Sync> = match config.source {
        SourceKind::Stdin => Arc::new(ImageSourceStdin::new(logger.clone())),
        SourceKind::Fake => Arc::new(ImageSourceFake::new(
            logger.clone(),
            config.fake_upload_interval,
        )),
    };

    let display: Arc<Mutex<dyn Display + Send + Sync>> = match config.display {
        DisplayKind::Console => Arc::new(Mutex::new(DisplayConsole::new())),
        DisplayKind::Gui => Arc::new(Mutex::new(DisplayGui::new())),
    };
    display.lock().map_err(|e| e.to_string())?.init()?;

    let _ = logger.info(&format!(
        "Starting with materials {:?}, acceptance threshold {}",
        config.category_map.material_types(),
        config.acceptance_threshold()
    ));

    let recycle_scanner =
        RecycleScanner::new(config, logger, image_source, image_classifier, display);

    recycle_scanner.run()
}
