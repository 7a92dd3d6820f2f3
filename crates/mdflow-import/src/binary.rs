//! Binary-file detection (spec §4.4): a fast extension/basename check used
//! as the default path, falling back to a NUL-byte sniff of the first 8 KiB
//! when the extension alone is inconclusive.

use std::path::Path;

const BINARY_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tiff", "tif", "svgz", "heic", "avif",
    // executables / libraries
    "exe", "dll", "so", "dylib", "bin", "o", "obj", "class", "wasm",
    // archives
    "zip", "tar", "gz", "bz2", "xz", "7z", "rar", "jar", "war", "tgz",
    // office docs
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp",
    // databases
    "db", "sqlite", "sqlite3", "mdb",
    // media
    "mp3", "mp4", "wav", "avi", "mov", "mkv", "flac", "ogg", "webm",
    // fonts
    "ttf", "otf", "woff", "woff2",
];

/// Fast path: basename/extension says binary without reading the file.
pub fn is_binary_by_name(path: &Path) -> bool {
    if path.file_name().and_then(|n| n.to_str()) == Some(".DS_Store") {
        return true;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Slow path: sniffs the first 8 KiB of `content` for a NUL byte.
pub fn is_binary_content(content: &[u8]) -> bool {
    let prefix_len = content.len().min(8 * 1024);
    content[..prefix_len].contains(&0u8)
}

/// Full check used when the extension alone is inconclusive: reads up to
/// 8 KiB from `path` and sniffs it.
pub fn is_binary_file(path: &Path) -> std::io::Result<bool> {
    if is_binary_by_name(path) {
        return Ok(true);
    }
    use std::io::Read;
    let mut file = std::fs::File::open(path)?;
    let mut buf = [0u8; 8 * 1024];
    let n = file.read(&mut buf)?;
    Ok(is_binary_content(&buf[..n]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ds_store_is_binary() {
        assert!(is_binary_by_name(Path::new("/some/dir/.DS_Store")));
    }

    #[test]
    fn known_extensions_are_binary_case_insensitively() {
        assert!(is_binary_by_name(Path::new("photo.PNG")));
        assert!(is_binary_by_name(Path::new("archive.zip")));
        assert!(!is_binary_by_name(Path::new("notes.md")));
    }

    #[test]
    fn nul_byte_prefix_detected() {
        let mut content = vec![b'a'; 100];
        content[50] = 0;
        assert!(is_binary_content(&content));
    }

    #[test]
    fn plain_text_is_not_binary() {
        assert!(!is_binary_content(b"just some text, no nulls here"));
    }

    #[test]
    fn is_binary_file_reads_real_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data.bin");
        std::fs::write(&path, [0u8, 1, 2, 3]).unwrap();
        assert!(is_binary_file(&path).unwrap());

        let text_path = tmp.path().join("notes.txt");
        std::fs::write(&text_path, "hello world").unwrap();
        assert!(!is_binary_file(&text_path).unwrap());
    }
}
