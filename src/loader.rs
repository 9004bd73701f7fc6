use crate::detect::FaceDetector;
use crate::document::ImageEntry;
use crate::error::ImportError;
use crate::session::SessionStore;
use crate::tools::ToolSettings;

/// One file handed to the loader: a display name plus raw bytes (from a
/// drop, a picker, or a path read).
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Ingest a batch of files strictly sequentially: sniff the container,
/// decode, run face detection, then add the entry to the session (which
/// selects it, so the most recently added image ends up on screen).
///
/// Fail-fast: the first failing file aborts the rest of the batch rather
/// than half-succeeding silently. Entries already loaded are untouched and
/// the session stays usable. Returns how many files were loaded.
pub fn load_files(
    session: &mut SessionStore,
    files: Vec<InputFile>,
    detector: &dyn FaceDetector,
    tools: &ToolSettings,
) -> Result<usize, ImportError> {
    let mut loaded = 0;
    for file in files {
        load_one(session, file, detector, tools)?;
        loaded += 1;
    }
    Ok(loaded)
}

fn load_one(
    session: &mut SessionStore,
    file: InputFile,
    detector: &dyn FaceDetector,
    tools: &ToolSettings,
) -> Result<(), ImportError> {
    // A container the image crate cannot even identify needs a pre-decode
    // transcode step we don't have; report it distinctly from decode errors.
    let format = image::guess_format(&file.bytes).map_err(|_| ImportError::Transcode {
        name: file.name.clone(),
    })?;

    let decoded = image::load_from_memory_with_format(&file.bytes, format).map_err(|e| {
        ImportError::Decode {
            name: file.name.clone(),
            reason: e.to_string(),
        }
    })?;
    let raster = decoded.to_rgba8();
    log::debug!(
        "decoded {} ({}x{}, {:?})",
        file.name,
        raster.width(),
        raster.height(),
        format
    );

    let faces = detector
        .detect(&raster)
        .map_err(|e| ImportError::Detection {
            name: file.name.clone(),
            reason: e.to_string(),
        })?;
    log::info!("{}: {} face(s) detected", file.name, faces.len());

    session.push(ImageEntry::new(file.name, raster, &faces, tools));
    Ok(())
}
