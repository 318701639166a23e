//! Gzip compression of rotated log files

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

/// Compresses `path` into `<path>.gz` and removes the original.
///
/// Returns the path of the compressed file.
pub fn gzip_in_place(path: &Path) -> io::Result<PathBuf> {
    let mut compressed = path.as_os_str().to_owned();
    compressed.push(".gz");
    let compressed = PathBuf::from(compressed);

    let mut input = BufReader::new(File::open(path)?);
    let mut encoder = GzEncoder::new(
        BufWriter::new(File::create(&compressed)?),
        Compression::default(),
    );
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.flush()?;

    fs::remove_file(path)?;
    Ok(compressed)
}
