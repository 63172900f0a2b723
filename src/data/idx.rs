//! Readers for the IDX binary format used by MNIST.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-3:   0x00000803  (magic: uint8 data, 3 dimensions)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   0x00000801  (magic: uint8 data, 1 dimension)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index
//! ```

use std::fs;
use std::path::Path;

use tracing::info;

use crate::data::dataset::DataSet;
use crate::data::encode::{normalize, one_hot};
use crate::error::{MlpError, Result};

pub const IMAGE_MAGIC: u32 = 0x0000_0803;
pub const LABEL_MAGIC: u32 = 0x0000_0801;

/// MNIST image side length in pixels.
pub const MNIST_SIDE: usize = 28;
pub const MNIST_CLASSES: usize = 10;

pub const TRAINING_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAINING_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// Decoded IDX3 image file.
#[derive(Debug, Clone, PartialEq)]
pub struct IdxImages {
    pub rows: usize,
    pub cols: usize,
    /// One `rows * cols` byte vector per image.
    pub pixels: Vec<Vec<u8>>,
}

pub fn parse_idx_images(bytes: &[u8]) -> Result<IdxImages> {
    if bytes.len() < 16 {
        return Err(MlpError::Format(format!(
            "IDX image file too short: expected at least 16 header bytes, got {}",
            bytes.len()
        )));
    }

    let magic = read_u32(bytes, 0);
    if magic != IMAGE_MAGIC {
        return Err(MlpError::Format(format!(
            "IDX image file magic number mismatch: expected {:#010x}, got {:#010x}",
            IMAGE_MAGIC, magic
        )));
    }

    let n_items = read_u32(bytes, 4) as usize;
    let rows = read_u32(bytes, 8) as usize;
    let cols = read_u32(bytes, 12) as usize;

    let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
        MlpError::Format(format!("IDX image file: rows * cols overflows (rows={}, cols={})", rows, cols))
    })?;
    if n_pixels == 0 {
        return Err(MlpError::Format(format!(
            "IDX image file declares empty {}x{} images",
            rows, cols
        )));
    }
    let data_len = n_items.checked_mul(n_pixels).ok_or_else(|| {
        MlpError::Format(format!(
            "IDX image file: n_items * n_pixels overflows (n_items={}, n_pixels={})",
            n_items, n_pixels
        ))
    })?;

    let data = 16usize
        .checked_add(data_len)
        .and_then(|end| bytes.get(16..end))
        .ok_or_else(|| {
            MlpError::Format(format!(
                "IDX image file too short: header declares {} images of {}x{} pixels \
                 ({} data bytes), but file is only {} bytes",
                n_items, rows, cols, data_len, bytes.len()
            ))
        })?;

    Ok(IdxImages {
        rows,
        cols,
        pixels: data.chunks_exact(n_pixels).map(<[u8]>::to_vec).collect(),
    })
}

pub fn parse_idx_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < 8 {
        return Err(MlpError::Format(format!(
            "IDX label file too short: expected at least 8 header bytes, got {}",
            bytes.len()
        )));
    }

    let magic = read_u32(bytes, 0);
    if magic != LABEL_MAGIC {
        return Err(MlpError::Format(format!(
            "IDX label file magic number mismatch: expected {:#010x}, got {:#010x}",
            LABEL_MAGIC, magic
        )));
    }

    let n_items = read_u32(bytes, 4) as usize;
    let data = bytes.get(8..8 + n_items).ok_or_else(|| {
        MlpError::Format(format!(
            "IDX label file too short: header declares {} labels but file is only {} bytes",
            n_items,
            bytes.len()
        ))
    })?;

    Ok(data.to_vec())
}

/// Pairs decoded images with labels, normalizing pixels and one-hot
/// encoding labels into `n_classes` columns.
pub fn to_dataset(images: &IdxImages, labels: &[u8], n_classes: usize) -> Result<DataSet> {
    if images.pixels.len() != labels.len() {
        return Err(MlpError::Format(format!(
            "IDX file mismatch: image file declares {} items but label file declares {}",
            images.pixels.len(),
            labels.len()
        )));
    }

    let inputs = images.pixels.iter().map(|p| normalize(p)).collect();
    let targets = labels
        .iter()
        .map(|&label| one_hot(label as usize, n_classes))
        .collect::<Result<Vec<_>>>()?;

    DataSet::new(inputs, targets)
}

/// Reads an uncompressed image/label file pair, requiring 28×28 images.
pub fn load_idx_pair(images_path: &Path, labels_path: &Path) -> Result<DataSet> {
    let images = parse_idx_images(&fs::read(images_path)?)?;
    if (images.rows, images.cols) != (MNIST_SIDE, MNIST_SIDE) {
        return Err(MlpError::Format(format!(
            "{}: expected {}x{} images, got {}x{}",
            images_path.display(),
            MNIST_SIDE,
            MNIST_SIDE,
            images.rows,
            images.cols
        )));
    }
    let labels = parse_idx_labels(&fs::read(labels_path)?)?;
    to_dataset(&images, &labels, MNIST_CLASSES)
}

/// Loads the MNIST training and test sets from `dir`.
pub fn load_mnist(dir: &Path) -> Result<(DataSet, DataSet)> {
    let training = load_idx_pair(&dir.join(TRAINING_IMAGES), &dir.join(TRAINING_LABELS))?;
    let test = load_idx_pair(&dir.join(TEST_IMAGES), &dir.join(TEST_LABELS))?;
    info!(
        training = training.len(),
        test = test.len(),
        dir = %dir.display(),
        "loaded MNIST"
    );
    Ok((training, test))
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_file(n: u32, rows: u32, cols: u32, data: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&IMAGE_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&n.to_be_bytes());
        bytes.extend_from_slice(&rows.to_be_bytes());
        bytes.extend_from_slice(&cols.to_be_bytes());
        bytes.extend_from_slice(data);
        bytes
    }

    fn label_file(labels: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&LABEL_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        bytes.extend_from_slice(labels);
        bytes
    }

    #[test]
    fn parses_images_and_labels_into_dataset() {
        let images = parse_idx_images(&image_file(2, 1, 2, &[0, 255, 51, 0])).unwrap();
        assert_eq!((images.rows, images.cols), (1, 2));
        assert_eq!(images.pixels, vec![vec![0, 255], vec![51, 0]]);

        let labels = parse_idx_labels(&label_file(&[1, 0])).unwrap();
        let set = to_dataset(&images, &labels, 2).unwrap();
        assert_eq!(set.len(), 2);
        let (x, y) = set.get(0).unwrap();
        assert_eq!(x.to_vec(), vec![0.0, 1.0]);
        assert_eq!(y.to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = image_file(1, 1, 1, &[0]);
        bytes[3] = 0x01;
        assert!(matches!(parse_idx_images(&bytes), Err(MlpError::Format(_))));
        assert!(matches!(
            parse_idx_labels(&image_file(1, 1, 1, &[0])),
            Err(MlpError::Format(_))
        ));
    }

    #[test]
    fn rejects_truncated_data() {
        assert!(matches!(
            parse_idx_images(&image_file(3, 2, 2, &[0; 8])),
            Err(MlpError::Format(_))
        ));
        let mut labels = label_file(&[1, 2, 3]);
        labels.pop();
        assert!(matches!(parse_idx_labels(&labels), Err(MlpError::Format(_))));
    }

    #[test]
    fn rejects_count_mismatch_and_label_range() {
        let images = parse_idx_images(&image_file(1, 1, 1, &[9])).unwrap();
        assert!(matches!(to_dataset(&images, &[0, 1], 2), Err(MlpError::Format(_))));
        assert!(matches!(to_dataset(&images, &[5], 2), Err(MlpError::Format(_))));
    }
}
