use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes data atomically by using a temporary sibling file followed by rename.
/// 以臨時檔案搭配 rename 實現原子寫入。
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    write_atomic_with(path, |out| out.write_all(data))
}

/// Streams into `<path>.tmp` and renames it over `path` only when `write` and
/// the final flush succeed. On failure the temporary file is removed and
/// `path` is left untouched.
pub fn write_atomic_with<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = temp_sibling(path);
    let mut out = BufWriter::new(File::create(&tmp_path)?);
    let result = write(&mut out).and_then(|()| out.flush());
    drop(out);
    match result {
        Ok(()) => fs::rename(&tmp_path, path),
        Err(err) => {
            let _ = fs::remove_file(&tmp_path);
            Err(err)
        }
    }
}

/// `styles.e4h` becomes `styles.e4h.tmp`.
pub(crate) fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
