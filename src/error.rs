use std::path::PathBuf;

/// Errors raised while loading and parsing a map file (§6 text format).
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("could not read map file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("map file {path} ended before the height/width header was read")]
    MissingHeader { path: PathBuf },

    #[error("map file {path} line {line}: expected `height <N>`, found {found:?}")]
    BadHeightHeader {
        path: PathBuf,
        line: usize,
        found: String,
    },

    #[error("map file {path} line {line}: expected `width <N>`, found {found:?}")]
    BadWidthHeader {
        path: PathBuf,
        line: usize,
        found: String,
    },

    #[error("map file {path} line {line}: expected column header `X Y Length Width`, found {found:?}")]
    BadColumnHeader {
        path: PathBuf,
        line: usize,
        found: String,
    },
}
