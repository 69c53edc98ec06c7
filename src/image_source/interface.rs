#[derive(Clone, PartialEq)]
pub struct ImageUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSourceEvent {
    Submitted(ImageUpload),
    Rejected { name: String, reason: String },
    Closed,
}

pub trait ImageSource {
    fn events(&self) -> std::sync::mpsc::Receiver<ImageSourceEvent>;
}
