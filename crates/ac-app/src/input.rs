use std::io::{IsTerminal, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Lit les octets bruts de l'entrée : un fichier, ou stdin pour `"-"`.
///
/// # Errors
/// Returns an error if the file cannot be read, or if `"-"` is given while
/// nothing is piped to stdin.
pub fn read_input(arg: &str) -> Result<Vec<u8>> {
    if arg == "-" {
        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            bail!("there is no input being piped to stdin");
        }
        let mut bytes = Vec::new();
        stdin
            .read_to_end(&mut bytes)
            .context("unable to read piped input")?;
        log::debug!("read {} bytes from stdin", bytes.len());
        return Ok(bytes);
    }
    let path = Path::new(arg);
    let bytes = std::fs::read(path).with_context(|| format!("Impossible de lire {}", path.display()))?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Formats acceptés en entrée, pour `--formats`.
pub const SUPPORTED_FORMATS: &str = "JPEG/JPG, PNG, WEBP, BMP, TIFF/TIF, GIF";

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x89PNG").unwrap();
        let path = file.path().to_string_lossy().into_owned();
        assert_eq!(read_input(&path).unwrap(), b"\x89PNG");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_input("/definitely/not/here.png").unwrap_err();
        assert!(format!("{err:#}").contains("here.png"));
    }
}
