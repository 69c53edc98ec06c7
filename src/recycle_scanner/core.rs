use crate::classification::error::ClassifyError;
use crate::classification::verdict::{ClassificationOutcome, Verdict};
use crate::config::Config;
use crate::image_source::interface::{ImageSourceEvent, ImageUpload};
use std::time::Instant;

/// Last outcome shown to the user, with the upload it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Shown {
    pub name: String,
    pub outcome: ClassificationOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    /// Uploads arriving now wait in `pending`; only the newest is kept.
    ModelLoading {
        latest_request: u64,
        pending: Option<ImageUpload>,
        last: Option<Shown>,
        source_closed: bool,
    },
    ModelUnavailable {
        latest_request: u64,
        message: String,
        retryable: bool,
        since: Instant,
        last: Option<Shown>,
    },
    Ready {
        latest_request: u64,
        last: Option<Shown>,
    },
    Classifying {
        request_id: u64,
        name: String,
        last: Option<Shown>,
        source_closed: bool,
    },
    Stopped {
        last: Option<Shown>,
    },
}

#[derive(Debug)]
pub enum Event {
    Tick(Instant),
    ModelLoadDone(Result<(), ClassifyError>),
    ImageSource(ImageSourceEvent),
    ClassifyDone {
        request_id: u64,
        result: Result<Verdict, ClassifyError>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadModel,
    SubscribeToImages,
    SubscribeTick,
    ClassifyImage { request_id: u64, upload: ImageUpload },
}

pub fn init() -> (State, Vec<Effect>) {
    (
        State::ModelLoading {
            latest_request: 0,
            pending: None,
            last: None,
            source_closed: false,
        },
        vec![
            Effect::LoadModel,
            Effect::SubscribeToImages,
            Effect::SubscribeTick,
        ],
    )
}

fn unclassifiable(name: String, error: ClassifyError) -> Option<Shown> {
    Some(Shown {
        name,
        outcome: ClassificationOutcome::Unclassifiable(error),
    })
}

/// Nothing is left to answer once the source is closed, so a retryable
/// failure stops instead of retrying forever.
fn model_unavailable(
    latest_request: u64,
    message: String,
    retryable: bool,
    last: Option<Shown>,
    source_closed: bool,
) -> State {
    if source_closed && retryable {
        State::Stopped { last }
    } else {
        State::ModelUnavailable {
            latest_request,
            message,
            retryable,
            since: Instant::now(),
            last,
        }
    }
}

pub fn transition(config: &Config, state: State, event: Event) -> (State, Vec<Effect>) {
    match (state, event) {
        // Model lifecycle
        (
            State::ModelLoading {
                latest_request,
                pending,
                last,
                source_closed,
            },
            Event::ModelLoadDone(Ok(())),
        ) => match pending {
            Some(upload) => start_request(latest_request + 1, upload, last, source_closed),
            None if source_closed => (State::Stopped { last }, vec![]),
            None => (
                State::Ready {
                    latest_request,
                    last,
                },
                vec![],
            ),
        },
        (
            State::ModelLoading {
                latest_request,
                pending,
                last,
                source_closed,
            },
            Event::ModelLoadDone(Err(error)),
        ) => {
            let (latest_request, last) = match pending {
                Some(upload) => (
                    latest_request + 1,
                    unclassifiable(upload.name, error.clone()),
                ),
                None => (latest_request, last),
            };
            (
                model_unavailable(
                    latest_request,
                    error.to_string(),
                    error.is_retryable(),
                    last,
                    source_closed,
                ),
                vec![],
            )
        }
        (
            State::ModelUnavailable {
                latest_request,
                message,
                retryable,
                since,
                last,
            },
            Event::Tick(now),
        ) => {
            if retryable && now.duration_since(since) >= config.model_retry_interval {
                (
                    State::ModelLoading {
                        latest_request,
                        pending: None,
                        last,
                        source_closed: false,
                    },
                    vec![Effect::LoadModel],
                )
            } else {
                (
                    State::ModelUnavailable {
                        latest_request,
                        message,
                        retryable,
                        since,
                        last,
                    },
                    vec![],
                )
            }
        }

        // Uploads
        (
            State::Ready {
                latest_request,
                last,
            },
            Event::ImageSource(ImageSourceEvent::Submitted(upload)),
        ) => start_request(latest_request + 1, upload, last, false),
        (
            State::Classifying {
                request_id, last, ..
            },
            Event::ImageSource(ImageSourceEvent::Submitted(upload)),
        ) => start_request(request_id + 1, upload, last, false),
        (
            State::ModelLoading {
                latest_request,
                last,
                source_closed,
                ..
            },
            Event::ImageSource(ImageSourceEvent::Submitted(upload)),
        ) => (
            State::ModelLoading {
                latest_request,
                pending: Some(upload),
                last,
                source_closed,
            },
            vec![],
        ),
        (
            State::ModelUnavailable {
                latest_request,
                message,
                retryable,
                since,
                ..
            },
            Event::ImageSource(ImageSourceEvent::Submitted(upload)),
        ) => {
            let last = unclassifiable(
                upload.name,
                ClassifyError::ModelUnavailable(message.clone()),
            );
            (
                State::ModelUnavailable {
                    latest_request: latest_request + 1,
                    message,
                    retryable,
                    since,
                    last,
                },
                vec![],
            )
        }
        (
            State::Ready { latest_request, .. },
            Event::ImageSource(ImageSourceEvent::Rejected { name, reason }),
        ) => (
            State::Ready {
                latest_request: latest_request + 1,
                last: unclassifiable(name, ClassifyError::InferenceFailure(reason)),
            },
            vec![],
        ),
        (
            State::Classifying { request_id, .. },
            Event::ImageSource(ImageSourceEvent::Rejected { name, reason }),
        ) => (
            State::Ready {
                latest_request: request_id + 1,
                last: unclassifiable(name, ClassifyError::InferenceFailure(reason)),
            },
            vec![],
        ),
        (
            State::ModelLoading {
                latest_request,
                source_closed,
                ..
            },
            Event::ImageSource(ImageSourceEvent::Rejected { name, reason }),
        ) => (
            State::ModelLoading {
                latest_request: latest_request + 1,
                pending: None,
                last: unclassifiable(name, ClassifyError::InferenceFailure(reason)),
                source_closed,
            },
            vec![],
        ),
        (
            State::ModelUnavailable {
                latest_request,
                message,
                retryable,
                since,
                ..
            },
            Event::ImageSource(ImageSourceEvent::Rejected { name, reason }),
        ) => (
            State::ModelUnavailable {
                latest_request: latest_request + 1,
                message,
                retryable,
                since,
                last: unclassifiable(name, ClassifyError::InferenceFailure(reason)),
            },
            vec![],
        ),
        (
            State::Ready { last, .. } | State::ModelUnavailable { last, .. },
            Event::ImageSource(ImageSourceEvent::Closed),
        ) => (State::Stopped { last }, vec![]),
        (
            State::ModelLoading {
                latest_request,
                pending,
                last,
                ..
            },
            Event::ImageSource(ImageSourceEvent::Closed),
        ) => match pending {
            None => (State::Stopped { last }, vec![]),
            pending => (
                State::ModelLoading {
                    latest_request,
                    pending,
                    last,
                    source_closed: true,
                },
                vec![],
            ),
        },
        (
            State::Classifying {
                request_id,
                name,
                last,
                ..
            },
            Event::ImageSource(ImageSourceEvent::Closed),
        ) => (
            State::Classifying {
                request_id,
                name,
                last,
                source_closed: true,
            },
            vec![],
        ),

        // Results
        (
            State::Classifying {
                request_id,
                name,
                last,
                source_closed,
            },
            Event::ClassifyDone {
                request_id: done_id,
                result,
            },
        ) => {
            if done_id != request_id {
                return (
                    State::Classifying {
                        request_id,
                        name,
                        last,
                        source_closed,
                    },
                    vec![],
                );
            }

            match result {
                Err(ClassifyError::ModelUnavailable(message)) => {
                    let last =
                        unclassifiable(name, ClassifyError::ModelUnavailable(message.clone()));
                    (
                        model_unavailable(request_id, message, true, last, source_closed),
                        vec![],
                    )
                }
                result => {
                    let outcome = match result {
                        Ok(verdict) => ClassificationOutcome::Classified(verdict),
                        Err(error) => ClassificationOutcome::Unclassifiable(error),
                    };
                    let last = Some(Shown { name, outcome });
                    if source_closed {
                        (State::Stopped { last }, vec![])
                    } else {
                        (
                            State::Ready {
                                latest_request: request_id,
                                last,
                            },
                            vec![],
                        )
                    }
                }
            }
        }

        // Default case
        (state, _) => (state, vec![]),
    }
}

fn start_request(
    request_id: u64,
    upload: ImageUpload,
    last: Option<Shown>,
    source_closed: bool,
) -> (State, Vec<Effect>) {
    (
        State::Classifying {
            request_id,
            name: upload.name.clone(),
            last,
            source_closed,
        },
        vec![Effect::ClassifyImage { request_id, upload }],
    )
}
