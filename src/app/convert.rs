// convert.rs
use crate::app::{ConversionUpdate, JPEG_QUALITY};
use crate::utils::{get_memory_usage, measure_time, Logger};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Why a single file failed to convert. One value per file; the batch itself
/// never fails.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot read or write file: {0}")]
    Io(#[from] std::io::Error),
    #[error("HEIF decode failed: {0}")]
    Decode(#[from] libheif_rs::HeifError),
    #[error("decoder returned no interleaved RGB plane")]
    PixelLayout,
    #[error("decoded pixel buffer does not match image dimensions")]
    Dimensions,
    #[error("JPEG encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Background worker entry point: converts every collected file in order,
/// one at a time, reporting progress over `sender`. A per-file failure is
/// logged and counted; the loop always runs to the end and finishes with a
/// single `Completed` tally.
pub fn run_conversion(files: Vec<PathBuf>, output_directory: PathBuf, sender: Sender<ConversionUpdate>) {
    let logger = Logger::new(sender.clone());
    let total = files.len();
    logger.log(format!("Found {} HEIC/HEIF file(s)", total));
    logger.log(format!("Output directory: {}", output_directory.display()));
    logger.log(get_memory_usage());

    let mut ok = 0usize;
    let mut failed = 0usize;

    for (index, src) in files.iter().enumerate() {
        let name = src
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        sender
            .send(ConversionUpdate::Converting(index))
            .unwrap_or_default();

        let (result, duration) = measure_time(|| convert_one(src, &output_directory));
        match result {
            Ok(dst) => {
                ok += 1;
                logger.log(format!("OK  {} -> {} ({:?})", name, dst.display(), duration));
                sender
                    .send(ConversionUpdate::FileDone { index, error: None })
                    .unwrap_or_default();
            }
            Err(err) => {
                failed += 1;
                logger.log(format!("FAILED  {}: {}", name, err));
                sender
                    .send(ConversionUpdate::FileDone {
                        index,
                        error: Some(err.to_string()),
                    })
                    .unwrap_or_default();
            }
        }
    }

    logger.log(get_memory_usage());
    logger.log(format!("Done. {} succeeded, {} failed.", ok, failed));
    sender
        .send(ConversionUpdate::Completed { ok, failed })
        .unwrap_or_default();
}

/// Converts one source file into `output_directory`, creating the directory
/// if needed. Returns the path the JPEG landed at.
pub fn convert_one(src: &Path, output_directory: &Path) -> Result<PathBuf, ConvertError> {
    fs::create_dir_all(output_directory)?;

    let rgb = decode_heif(src)?;
    let dst = unique_output_path(output_directory, src);

    let file = File::create(&dst)?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY).encode_image(&rgb)?;
    writer.flush()?;

    Ok(dst)
}

/// Decodes a HEIC/HEIF file into an 8-bit RGB image buffer.
fn decode_heif(src: &Path) -> Result<RgbImage, ConvertError> {
    let bytes = fs::read(src)?;
    let lib_heif = LibHeif::new();
    let context = HeifContext::read_from_bytes(&bytes)?;
    let handle = context.primary_image_handle()?;
    let decoded = lib_heif.decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)?;

    let planes = decoded.planes();
    let plane = planes.interleaved.ok_or(ConvertError::PixelLayout)?;
    let row_len = plane.width as usize * 3;

    // Rows are stride-padded; repack them tightly for the encoder.
    let mut pixels = Vec::with_capacity(row_len * plane.height as usize);
    for row in plane.data.chunks(plane.stride).take(plane.height as usize) {
        if row.len() < row_len {
            return Err(ConvertError::PixelLayout);
        }
        pixels.extend_from_slice(&row[..row_len]);
    }

    RgbImage::from_raw(plane.width, plane.height, pixels).ok_or(ConvertError::Dimensions)
}

/// First free destination for `src` under `output_directory`: `stem.jpg`,
/// then `stem_1.jpg`, `stem_2.jpg`, ... Never reuses an existing name.
pub fn unique_output_path(output_directory: &Path, src: &Path) -> PathBuf {
    let stem = src.file_stem().unwrap_or_default().to_string_lossy();
    let mut dst = output_directory.join(format!("{}.jpg", stem));
    let mut suffix = 1u32;
    while dst.exists() {
        dst = output_directory.join(format!("{}_{}.jpg", stem, suffix));
        suffix += 1;
    }
    dst
}

/// Where output goes when the user cancels the output-directory dialog: a
/// `JPG_Output` subfolder beside the first input.
pub fn default_output_dir(inputs: &[PathBuf]) -> PathBuf {
    let base = inputs
        .first()
        .map(|first| {
            if first.is_dir() {
                first.clone()
            } else {
                first
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."))
            }
        })
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("JPG_Output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use tempfile::tempdir;

    #[test]
    fn unique_output_path_appends_numeric_suffix() {
        let dir = tempdir().unwrap();
        let out = dir.path();
        let src = Path::new("photo.heic");

        assert_eq!(unique_output_path(out, src), out.join("photo.jpg"));

        fs::write(out.join("photo.jpg"), b"x").unwrap();
        assert_eq!(unique_output_path(out, src), out.join("photo_1.jpg"));

        fs::write(out.join("photo_1.jpg"), b"x").unwrap();
        assert_eq!(unique_output_path(out, src), out.join("photo_2.jpg"));
    }

    #[test]
    fn default_output_dir_sits_beside_the_input() {
        let dir = tempdir().unwrap();
        let folder = dir.path().to_path_buf();
        let file = folder.join("img.heic");
        fs::write(&file, b"x").unwrap();

        // A directory input gets the subfolder inside it, a file input gets
        // it next to the file.
        assert_eq!(default_output_dir(&[folder.clone()]), folder.join("JPG_Output"));
        assert_eq!(default_output_dir(&[file]), folder.join("JPG_Output"));
    }

    #[test]
    fn convert_one_creates_missing_output_directory() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("broken.heic");
        fs::write(&src, b"definitely not a heif container").unwrap();
        let out = dir.path().join("out").join("nested");

        // The corrupt source fails to decode, but the directory is created
        // before the decode is attempted.
        assert!(convert_one(&src, &out).is_err());
        assert!(out.is_dir());
    }

    #[test]
    fn run_reports_every_file_and_a_final_tally() {
        let dir = tempdir().unwrap();
        let mut files = Vec::new();
        for name in ["a.heic", "b.heic", "c.heic"] {
            let path = dir.path().join(name);
            fs::write(&path, b"garbage").unwrap();
            files.push(path);
        }
        let out = dir.path().join("out");

        let (sender, receiver) = channel();
        run_conversion(files.clone(), out, sender);

        let mut converting = 0;
        let mut done = 0;
        let mut tally = None;
        for update in receiver.try_iter() {
            match update {
                ConversionUpdate::Converting(_) => converting += 1,
                ConversionUpdate::FileDone { error, .. } => {
                    assert!(error.is_some());
                    done += 1;
                }
                ConversionUpdate::Completed { ok, failed } => tally = Some((ok, failed)),
                ConversionUpdate::Log(_) => {}
            }
        }

        // Exactly one attempt per collected file, corrupt or not.
        assert_eq!(converting, files.len());
        assert_eq!(done, files.len());
        assert_eq!(tally, Some((0, files.len())));
    }

    #[test]
    fn failure_log_line_names_the_file() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("corrupt.heic");
        fs::write(&src, b"garbage").unwrap();

        let (sender, receiver) = channel();
        run_conversion(vec![src], dir.path().join("out"), sender);

        let logs: Vec<String> = receiver
            .try_iter()
            .filter_map(|u| match u {
                ConversionUpdate::Log(line) => Some(line),
                _ => None,
            })
            .collect();
        assert!(logs.iter().any(|l| l.contains("FAILED") && l.contains("corrupt.heic")));
        assert!(logs.iter().any(|l| l.contains("0 succeeded, 1 failed")));
    }
}
