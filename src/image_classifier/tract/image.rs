use crate::classification::error::ClassifyError;
use image::{imageops, DynamicImage};
use tract_onnx::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Normalization {
    /// Plain [0, 1] scaling.
    #[cfg(test)]
    pub const UNIT: Normalization = Normalization {
        mean: [0.0, 0.0, 0.0],
        std: [1.0, 1.0, 1.0],
    };

    pub const IMAGENET: Normalization = Normalization {
        mean: [0.485, 0.456, 0.406],
        std: [0.229, 0.224, 0.225],
    };
}

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ClassifyError> {
    image::load_from_memory(bytes)
        .map_err(|e| ClassifyError::InferenceFailure(format!("could not decode image: {}", e)))
}

/// Scales to fit and centers on a black canvas when the aspect ratio differs.
pub fn resize_image(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() * height == image.height() * width {
        return image.resize_exact(width, height, imageops::FilterType::Triangle);
    }

    let (w, h) = (image.width() as f32, image.height() as f32);
    let scale = (width as f32 / w).min(height as f32 / h);
    let new_w = ((w * scale) as u32).clamp(1, width);
    let new_h = ((h * scale) as u32).clamp(1, height);

    let scaled = image
        .resize_exact(new_w, new_h, imageops::FilterType::Triangle)
        .to_rgb8();

    let mut padded = image::RgbImage::new(width, height);
    let x_offset = (width - new_w) / 2;
    let y_offset = (height - new_h) / 2;
    imageops::overlay(&mut padded, &scaled, x_offset as i64, y_offset as i64);

    DynamicImage::from(padded)
}

fn image_to_tensor(image: &DynamicImage, normalization: Normalization) -> Tensor {
    let rgb = image.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);

    tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
        let pixel = rgb.get_pixel(x as u32, y as u32);
        (pixel[c] as f32 / 255.0 - normalization.mean[c]) / normalization.std[c]
    })
    .into_tensor()
}

/// NCHW float tensor of shape [1, 3, height, width].
pub fn resize_image_to_tensor(
    image: &DynamicImage,
    width: u32,
    height: u32,
    normalization: Normalization,
) -> Tensor {
    let resized = resize_image(image, width, height);
    image_to_tensor(&resized, normalization)
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|&e| (e / sum).clamp(0.0, 1.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        let mut img = ImageBuffer::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb(color);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_image_to_tensor_square() {
        let image = solid(100, 100, [255, 0, 0]);

        let tensor = resize_image_to_tensor(&image, 224, 224, Normalization::UNIT);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert_eq!(slice[0], 1.0);
        assert_eq!(slice[224 * 224], 0.0);
        assert_eq!(slice[2 * 224 * 224], 0.0);
    }

    #[test]
    fn test_image_to_tensor_rectangle() {
        let image = solid(200, 100, [255, 0, 0]);

        let tensor = resize_image_to_tensor(&image, 224, 224, Normalization::UNIT);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

        let slice = tensor.as_slice::<f32>().unwrap();
        // center is covered by the image, top row is padding
        assert_eq!(slice[112 * 224 + 112], 1.0);
        assert_eq!(slice[112], 0.0);
    }

    #[test]
    fn test_image_to_tensor_imagenet_normalization() {
        let image = solid(50, 50, [128, 128, 128]);

        let tensor = resize_image_to_tensor(&image, 224, 224, Normalization::IMAGENET);
        let slice = tensor.as_slice::<f32>().unwrap();

        let gray = 128.0 / 255.0;
        let plane = 224 * 224;
        assert!((slice[0] - (gray - 0.485) / 0.229).abs() < 0.0001);
        assert!((slice[plane] - (gray - 0.456) / 0.224).abs() < 0.0001);
        assert!((slice[2 * plane] - (gray - 0.406) / 0.225).abs() < 0.0001);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probabilities = softmax(&[2.0, 1.0, 0.1, -3.0]);

        let sum: f32 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 0.0001);
        assert!(probabilities[0] > probabilities[1]);
        assert!(probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_softmax_handles_large_logits() {
        let probabilities = softmax(&[1000.0, 1000.0]);

        assert!((probabilities[0] - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_image(&[0, 1, 2, 3]);

        assert!(matches!(result, Err(ClassifyError::InferenceFailure(_))));
    }
}
