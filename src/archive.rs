/// Archive extraction for the `archives` category.
///
/// The format is taken from the file extension: zip, tar, and gzip. A gzip
/// stream that carries a tar archive is unpacked as tar; any other gzip payload
/// is written out as a single file.
use crate::error::{SortError, SortResult};
use crate::transliterate::transliterate_file_name;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, Cursor, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Offset and value of the POSIX tar magic within the first header block.
const USTAR_MAGIC_OFFSET: usize = 257;
const USTAR_MAGIC: &[u8] = b"ustar";
const TAR_BLOCK: u64 = 512;

/// Archive formats the extractor can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    Gzip,
}

impl ArchiveFormat {
    /// Maps a file extension (any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "zip" => Some(Self::Zip),
            "tar" => Some(Self::Tar),
            "gz" => Some(Self::Gzip),
            _ => None,
        }
    }
}

/// Extracts `archive_path` into `destination`, creating it if needed.
///
/// # Errors
///
/// Returns `SortError::UnsupportedArchive` when the extension does not name a
/// known format, and I/O or zip errors from reading and writing entries.
pub fn extract(archive_path: &Path, destination: &Path) -> SortResult<()> {
    let ext = archive_path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    let format =
        ArchiveFormat::from_extension(&ext).ok_or_else(|| SortError::UnsupportedArchive {
            path: archive_path.to_path_buf(),
            format: ext,
        })?;

    fs::create_dir_all(destination).map_err(|e| SortError::io(destination, e))?;
    debug!(
        archive = %archive_path.display(),
        destination = %destination.display(),
        ?format,
        "extracting archive"
    );

    match format {
        ArchiveFormat::Zip => extract_zip(archive_path, destination),
        ArchiveFormat::Tar => {
            let file = File::open(archive_path).map_err(|e| SortError::io(archive_path, e))?;
            unpack_tar(file, archive_path, destination)
        }
        ArchiveFormat::Gzip => extract_gzip(archive_path, destination),
    }
}

fn extract_zip(archive_path: &Path, destination: &Path) -> SortResult<()> {
    let zip_error = |source: zip::result::ZipError| SortError::Zip {
        path: archive_path.to_path_buf(),
        source,
    };

    let file = File::open(archive_path).map_err(|e| SortError::io(archive_path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(zip_error)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(zip_error)?;
        let Some(relative) = entry.enclosed_name() else {
            warn!(
                archive = %archive_path.display(),
                entry = entry.name(),
                "skipping zip entry that escapes the destination"
            );
            continue;
        };
        let out_path = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| SortError::io(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| SortError::io(parent, e))?;
        }
        let mut out_file = File::create(&out_path).map_err(|e| SortError::io(&out_path, e))?;
        io::copy(&mut entry, &mut out_file).map_err(|e| SortError::io(&out_path, e))?;
    }

    Ok(())
}

fn unpack_tar<R: Read>(reader: R, archive_path: &Path, destination: &Path) -> SortResult<()> {
    tar::Archive::new(reader)
        .unpack(destination)
        .map_err(|e| SortError::io(archive_path, e))
}

fn extract_gzip(archive_path: &Path, destination: &Path) -> SortResult<()> {
    let file = File::open(archive_path).map_err(|e| SortError::io(archive_path, e))?;
    let mut decoder = GzDecoder::new(file);

    let mut header = Vec::with_capacity(TAR_BLOCK as usize);
    (&mut decoder)
        .take(TAR_BLOCK)
        .read_to_end(&mut header)
        .map_err(|e| SortError::io(archive_path, e))?;

    let inner_stem = archive_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut payload = Cursor::new(header).chain(decoder);

    if is_tar_payload(payload.get_ref().0.get_ref(), &inner_stem) {
        return unpack_tar(payload, archive_path, destination);
    }

    let raw_stem = archive_path.file_stem().unwrap_or_default();
    let inner_name =
        transliterate_file_name(Path::new(raw_stem)).unwrap_or_else(|| raw_stem.to_os_string());
    let out_path = destination.join(inner_name);
    let mut out_file = File::create(&out_path).map_err(|e| SortError::io(&out_path, e))?;
    io::copy(&mut payload, &mut out_file).map_err(|e| SortError::io(archive_path, e))?;
    Ok(())
}

/// A gzip payload is treated as tar when its inner name ends in `.tar` or the
/// first block carries the ustar magic.
fn is_tar_payload(first_block: &[u8], inner_stem: &str) -> bool {
    if inner_stem.to_lowercase().ends_with(".tar") {
        return true;
    }
    first_block
        .get(USTAR_MAGIC_OFFSET..USTAR_MAGIC_OFFSET + USTAR_MAGIC.len())
        .is_some_and(|magic| magic == USTAR_MAGIC)
}
