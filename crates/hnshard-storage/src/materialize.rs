//! Decompresses gzipped shards into a scratch directory so SQLite can open them.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use flate2::read::GzDecoder;
use tempfile::TempPath;

/// Inflate `source` into a new file under `scratch_dir`.
///
/// The returned `TempPath` deletes the file when dropped, so the
/// decompressed copy lives exactly as long as the accessor holding it.
pub fn decompress_to_scratch(source: &Path, scratch_dir: &Path) -> io::Result<TempPath> {
    let input = File::open(source)?;
    let mut decoder = GzDecoder::new(BufReader::new(input));

    let out = tempfile::Builder::new()
        .prefix("hnshard-")
        .suffix(".db")
        .tempfile_in(scratch_dir)?;
    let (file, path) = out.into_parts();
    {
        let mut writer = BufWriter::new(file);
        io::copy(&mut decoder, &mut writer)?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    #[test]
    fn round_trips_gzip_payload() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("shard_0.sqlite.gz");
        let mut encoder = GzEncoder::new(File::create(&source).unwrap(), Compression::default());
        encoder.write_all(b"payload bytes").unwrap();
        encoder.finish().unwrap();

        let out = decompress_to_scratch(&source, dir.path()).unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"payload bytes");
        let kept = out.to_path_buf();
        drop(out);
        assert!(!kept.exists());
    }

    #[test]
    fn truncated_gzip_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("shard_0.sqlite.gz");
        std::fs::write(&source, [0x1f, 0x8b, 0x08, 0x00]).unwrap();
        assert!(decompress_to_scratch(&source, dir.path()).is_err());
    }
}
