use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{LinkError, Result};

const INDENT: &[u8] = b"    ";

/// Where a document is read from. `-` on the command line means stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

/// Where the linked document is written. `-` on the command line means stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    File(PathBuf),
}

impl Source {
    pub fn from_arg(arg: &Path) -> Self {
        if arg == Path::new("-") {
            Self::Stdin
        } else {
            Self::File(arg.to_path_buf())
        }
    }

    pub fn read(&self) -> Result<String> {
        match self {
            Self::Stdin => {
                let mut contents = String::new();
                io::stdin().read_to_string(&mut contents)?;
                Ok(contents)
            }
            Self::File(path) => Ok(fs::read_to_string(path)?),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdin => write!(f, "-"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Sink {
    pub fn from_arg(arg: &Path) -> Self {
        if arg == Path::new("-") {
            Self::Stdout
        } else {
            Self::File(arg.to_path_buf())
        }
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout)
    }

    /// Refuse sinks that would clobber the input or an existing file.
    pub fn check_writable(&self, source: &Source, force: bool) -> Result<()> {
        let Self::File(path) = self else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }
        if let Source::File(input) = source
            && fs::canonicalize(input)? == fs::canonicalize(path)?
        {
            return Err(LinkError::SameFile(path.clone()));
        }
        if !force {
            return Err(LinkError::OutputExists(path.clone()));
        }
        Ok(())
    }

    pub fn write(&self, contents: &str) -> Result<()> {
        match self {
            Self::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(contents.as_bytes())?;
                stdout.flush()?;
                Ok(())
            }
            Self::File(path) => write_atomic(path, contents.as_bytes()),
        }
    }
}

impl std::fmt::Display for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => write!(f, "-"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Serialize with 4-space indentation and a trailing newline.
pub fn render(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(|err| LinkError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

/// Write `contents` to a sibling temp file, then rename it over `path`, so a
/// failed write never leaves a truncated document behind.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| {
            LinkError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output path '{}' has no file name", path.display()),
            ))
        })?
        .to_string_lossy();
    let staging = dir.join(format!(".{name}.{}.tmp", Uuid::new_v4()));

    let written = File::create(&staging).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    if let Err(err) = written.and_then(|()| fs::rename(&staging, path)) {
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }

    log::debug!(
        "event=document_written path={} bytes={}",
        path.display(),
        contents.len()
    );
    Ok(())
}
