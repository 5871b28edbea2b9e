//! # Error Suggestions
//!
//! Turns library errors into user-facing errors with `hint:` lines. Errors
//! should say what went wrong and how to fix it.
//!
//! ```rust,ignore
//! use kit_stager::suggestions;
//!
//! pipeline::run(&config, &options).map_err(suggestions::with_hints)?;
//! ```

use crate::error::Error;

/// Hints for a library error, if any apply.
pub fn hints(error: &Error) -> Vec<String> {
    match error {
        Error::MissingPackageGroup { .. } => vec![
            "Check the --package name against the directories in --packages-dir".to_string(),
            "Drop --strict to skip missing groups with a warning".to_string(),
        ],
        Error::InvalidPackageGroup { .. } => {
            vec!["A package group is a single directory name under --packages-dir".to_string()]
        }
        Error::ToolLaunch { program, .. } => vec![format!(
            "Make sure '{}' is installed and executable",
            program
        )],
        Error::ToolFailed { tool, .. } if tool.as_str() == "repository query" => vec![
            "The staged metadata could not be read; check the generator output above".to_string(),
            "Use --skip-validate to keep the kit without querying it".to_string(),
        ],
        Error::Filesystem { source, .. }
            if source.kind() == std::io::ErrorKind::PermissionDenied =>
        {
            vec!["Check write access to --output-dir and read access to --packages-dir".to_string()]
        }
        _ => Vec::new(),
    }
}

/// Wrap a library error with its hints appended.
pub fn with_hints(error: Error) -> anyhow::Error {
    let hints = hints(&error);
    if hints.is_empty() {
        return error.into();
    }
    let hint_lines = hints
        .iter()
        .map(|h| format!("hint: {}", h))
        .collect::<Vec<_>>()
        .join("\n");
    anyhow::Error::new(error).context(HintedMessage(hint_lines))
}

/// Context layer carrying hint lines; displayed after the error itself.
#[derive(Debug)]
pub struct HintedMessage(pub String);

impl std::fmt::Display for HintedMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render an error for the terminal: the root message followed by hints.
pub fn render(error: &anyhow::Error) -> String {
    match error.downcast_ref::<HintedMessage>() {
        Some(hints) => {
            let root = error
                .chain()
                .nth(1)
                .map(|e| e.to_string())
                .unwrap_or_default();
            format!("{}\n\n{}", root, hints)
        }
        None => error.to_string(),
    }
}
