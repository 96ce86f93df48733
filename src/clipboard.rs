//! Copying text to the system clipboard through the platform's clipboard tool.

use crate::error::{Result, ShelfError};
use std::io::Write;
use std::process::{Command, Stdio};

/// Tools tried in order: (program, args)
#[cfg(target_os = "linux")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard", "-i"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[cfg(target_os = "macos")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[];

/// Copy `text` using the first clipboard tool that accepts it
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    for (program, args) in CLIPBOARD_TOOLS {
        match pipe_to(program, args, text) {
            Ok(()) => {
                log::debug!("copied {} bytes with {}", text.len(), program);
                return Ok(());
            }
            Err(e) => log::debug!("{} unavailable: {}", program, e),
        }
    }

    Err(ShelfError::Clipboard(format!(
        "no clipboard tool available (tried: {})",
        CLIPBOARD_TOOLS
            .iter()
            .map(|(program, _)| *program)
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(ShelfError::Clipboard(format!("{} exited with {}", program, status)))
    }
}
