use std::fmt;

use thiserror::Error;

/// A single in-place text edit, located by a literal fragment of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchDirective {
    InsertAfter { anchor: String, payload: String },
    InsertBefore { anchor: String, payload: String },
    Replace { target: String, payload: String },
    Delete { target: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("anchor not found: {0:?}")]
    AnchorNotFound(String),
    #[error("text to replace not found: {0:?}")]
    TargetNotFound(String),
    #[error("file already contains {0:?}")]
    AlreadyPresent(String),
    #[error("patch needle is empty")]
    EmptyNeedle,
}

impl PatchDirective {
    pub fn insert_after(anchor: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::InsertAfter {
            anchor: anchor.into(),
            payload: payload.into(),
        }
    }

    pub fn insert_before(anchor: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::InsertBefore {
            anchor: anchor.into(),
            payload: payload.into(),
        }
    }

    pub fn replace(target: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::Replace {
            target: target.into(),
            payload: payload.into(),
        }
    }

    pub fn delete(target: impl Into<String>) -> Self {
        Self::Delete {
            target: target.into(),
        }
    }

    /// Apply the edit to `content`, touching only the first occurrence of the needle.
    pub fn apply(&self, content: &str) -> Result<String, PatchError> {
        let needle = self.needle();
        if needle.is_empty() {
            return Err(PatchError::EmptyNeedle);
        }

        match self {
            Self::InsertAfter { anchor, payload } => {
                let at = locate_anchor(content, anchor, payload)? + anchor.len();
                Ok(splice(content, at, at, payload))
            }
            Self::InsertBefore { anchor, payload } => {
                let at = locate_anchor(content, anchor, payload)?;
                Ok(splice(content, at, at, payload))
            }
            Self::Replace { target, payload } => {
                let at = content
                    .find(target.as_str())
                    .ok_or_else(|| PatchError::TargetNotFound(target.clone()))?;
                Ok(splice(content, at, at + target.len(), payload))
            }
            Self::Delete { target } => {
                let at = content
                    .find(target.as_str())
                    .ok_or_else(|| PatchError::TargetNotFound(target.clone()))?;
                Ok(splice(content, at, at + target.len(), ""))
            }
        }
    }

    /// The directive that undoes this one.
    ///
    /// A deletion has no standalone inverse: once the text is gone so is its
    /// position, so it is undone by the insertion that produced it.
    pub fn inverse(&self) -> Option<Self> {
        match self {
            Self::InsertAfter { payload, .. } | Self::InsertBefore { payload, .. } => {
                Some(Self::delete(payload.clone()))
            }
            Self::Replace { target, payload } => Some(Self::replace(payload.clone(), target.clone())),
            Self::Delete { .. } => None,
        }
    }

    fn needle(&self) -> &str {
        match self {
            Self::InsertAfter { anchor, .. } | Self::InsertBefore { anchor, .. } => anchor,
            Self::Replace { target, .. } | Self::Delete { target } => target,
        }
    }
}

impl fmt::Display for PatchDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertAfter { anchor, .. } => write!(f, "insert after {anchor:?}"),
            Self::InsertBefore { anchor, .. } => write!(f, "insert before {anchor:?}"),
            Self::Replace { target, .. } => write!(f, "replace {target:?}"),
            Self::Delete { target } => write!(f, "delete {target:?}"),
        }
    }
}

fn locate_anchor(content: &str, anchor: &str, payload: &str) -> Result<usize, PatchError> {
    if !payload.is_empty() && content.contains(payload) {
        return Err(PatchError::AlreadyPresent(payload.to_string()));
    }
    content
        .find(anchor)
        .ok_or_else(|| PatchError::AnchorNotFound(anchor.to_string()))
}

fn splice(content: &str, start: usize, end: usize, insert: &str) -> String {
    let mut out = String::with_capacity(content.len() + insert.len());
    out.push_str(&content[..start]);
    out.push_str(insert);
    out.push_str(&content[end..]);
    out
}
