use image::RgbaImage;
use thiserror::Error;

/// Bounding box of a detected face in the image's native pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FaceBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Error)]
#[error("face detection failed: {0}")]
pub struct DetectError(pub String);

/// Pluggable face detection backend.
///
/// The returned boxes are treated as authoritative and immutable: they seed
/// an image's detected region set once and are never refreshed.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &RgbaImage) -> Result<Vec<FaceBounds>, DetectError>;
}

/// Detector used when no backend is configured. Images load with no
/// detected regions; manual redaction still works.
pub struct DisabledDetector;

impl FaceDetector for DisabledDetector {
    fn detect(&self, _image: &RgbaImage) -> Result<Vec<FaceBounds>, DetectError> {
        log::warn!("face detection disabled; loading image without detected regions");
        Ok(Vec::new())
    }
}

/// Face detector backed by the `rustface` crate (SeetaFace engine).
#[cfg(feature = "face-detection")]
pub struct RustfaceDetector {
    model: rustface::Model,
}

#[cfg(feature = "face-detection")]
impl RustfaceDetector {
    /// Load a SeetaFace model file (e.g. `seeta_fd_frontal_v1.0.bin`).
    pub fn from_model_path(path: &std::path::Path) -> Result<Self, DetectError> {
        let model = rustface::read_model(std::io::BufReader::new(
            std::fs::File::open(path).map_err(|e| DetectError(e.to_string()))?,
        ))
        .map_err(|e| DetectError(e.to_string()))?;
        Ok(Self { model })
    }
}

#[cfg(feature = "face-detection")]
impl FaceDetector for RustfaceDetector {
    fn detect(&self, image: &RgbaImage) -> Result<Vec<FaceBounds>, DetectError> {
        let gray = image::imageops::grayscale(image);
        let (width, height) = (gray.width(), gray.height());

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBounds {
                    x: bbox.x() as f32,
                    y: bbox.y() as f32,
                    width: bbox.width() as f32,
                    height: bbox.height() as f32,
                }
            })
            .collect())
    }
}
