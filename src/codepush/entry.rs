//! Wrapping the app's default export in `codePush(...)`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::model::patch::PatchDirective;
use crate::toolbox::FileSystem;

pub const CODE_PUSH_IMPORT: &str = "import codePush from 'react-native-code-push';";

const REACT_IMPORT_ANCHORS: [&str; 2] = ["from 'react'", "from \"react\""];
const APP_JS_EXPORT: &str = "export default App;";
const APP_JS_WRAPPED: &str = "export default codePush(App);";

static DEFAULT_EXPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"export default\s+").expect("valid default export regex"));
static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:class\b|(?:async\s+)?function\b\s*\*?)\s*([A-Za-z_$][\w$]*)?")
        .expect("valid declaration regex")
});
static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$]*").expect("valid identifier regex"));
static WRAPPED_EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export default codePush\(([A-Za-z_$][\w$]*)\)").expect("valid wrapped export regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("no `from 'react'` import to anchor on")]
    NoReactImport,
    #[error("no `export default` to wrap")]
    NoDefaultExport,
    #[error("no `export default codePush(...)` to unwrap")]
    NotWrapped,
    #[error("default export has no name to wrap: `{0}`")]
    AnonymousExport(String),
}

const KEYWORDS: [&str; 12] = [
    "async", "await", "class", "extends", "function", "new", "null", "this", "typeof", "void",
    "yield", "delete",
];

/// Candidate entry files, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    AppJs,
    IndexJs,
    IndexTsx,
}

impl EntryKind {
    pub const PRIORITY: [EntryKind; 3] = [EntryKind::AppJs, EntryKind::IndexJs, EntryKind::IndexTsx];

    pub fn relative_path(self) -> &'static str {
        match self {
            Self::AppJs => "App.js",
            Self::IndexJs => "app/index.js",
            Self::IndexTsx => "app/index.tsx",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFile {
    pub kind: EntryKind,
    pub path: PathBuf,
}

impl EntryFile {
    /// The first candidate that exists under `root`.
    pub fn locate(fs: &dyn FileSystem, root: &Path) -> Option<Self> {
        EntryKind::PRIORITY.into_iter().find_map(|kind| {
            let path = root.join(kind.relative_path());
            fs.exists(&path).then_some(Self { kind, path })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryEdit {
    Patch(PatchDirective),
    Append(String),
}

/// Edits that import CodePush and wrap the default export.
pub fn plan_add(kind: EntryKind, content: &str) -> Result<Vec<EntryEdit>, EntryError> {
    let mut edits = vec![EntryEdit::Patch(import_insertion(content)?)];

    match kind {
        EntryKind::AppJs => {
            edits.push(EntryEdit::Patch(PatchDirective::replace(
                APP_JS_EXPORT,
                APP_JS_WRAPPED,
            )));
        }
        EntryKind::IndexJs | EntryKind::IndexTsx => edits.extend(export_wrap(content)?),
    }

    Ok(edits)
}

/// Edits that take the import and the wrapper back out.
pub fn plan_remove(kind: EntryKind, content: &str) -> Result<Vec<EntryEdit>, EntryError> {
    let eol = line_ending(content);
    let mut edits = vec![EntryEdit::Patch(PatchDirective::delete(format!(
        "{eol}{CODE_PUSH_IMPORT}"
    )))];

    match kind {
        EntryKind::AppJs => {
            edits.push(EntryEdit::Patch(PatchDirective::replace(
                APP_JS_WRAPPED,
                APP_JS_EXPORT,
            )));
        }
        EntryKind::IndexJs | EntryKind::IndexTsx => {
            let wrapped = WRAPPED_EXPORT_RE
                .captures(content)
                .ok_or(EntryError::NotWrapped)?;
            let name = &wrapped[1];
            edits.push(EntryEdit::Patch(PatchDirective::replace(
                &wrapped[0],
                format!("export default {name}"),
            )));
        }
    }

    Ok(edits)
}

/// Wrap the first default export of an index file.
fn export_wrap(content: &str) -> Result<Vec<EntryEdit>, EntryError> {
    let export = DEFAULT_EXPORT_RE
        .find(content)
        .ok_or(EntryError::NoDefaultExport)?;
    let rest = &content[export.end()..];

    // `export default class Foo` cannot be wrapped in place
    if let Some(decl) = DECLARATION_RE.captures(rest) {
        let name = named(decl.get(1).map(|m| m.as_str()), rest)?;
        let declaration = decl[0].to_string();
        let exported = format!("{}{declaration}", export.as_str());

        let eol = line_ending(content);
        let wrapper = format!("export default codePush({name});");
        let trailer = if content.ends_with('\n') {
            format!("{wrapper}{eol}")
        } else {
            format!("{eol}{wrapper}")
        };
        return Ok(vec![
            EntryEdit::Patch(PatchDirective::replace(exported, declaration)),
            EntryEdit::Append(trailer),
        ]);
    }

    let name = named(IDENTIFIER_RE.find(rest).map(|m| m.as_str()), rest)?;
    Ok(vec![EntryEdit::Patch(PatchDirective::replace(
        format!("{}{name}", export.as_str()),
        format!("export default codePush({name})"),
    ))])
}

fn named<'a>(name: Option<&'a str>, rest: &str) -> Result<&'a str, EntryError> {
    name.filter(|name| !KEYWORDS.contains(name)).ok_or_else(|| {
        let line = rest.lines().next().unwrap_or_default().trim();
        EntryError::AnonymousExport(format!("export default {line}"))
    })
}

fn line_ending(content: &str) -> &'static str {
    if content.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Insert the import on its own line after the first React import.
fn import_insertion(content: &str) -> Result<PatchDirective, EntryError> {
    let at = REACT_IMPORT_ANCHORS
        .iter()
        .filter_map(|anchor| content.find(anchor))
        .min()
        .ok_or(EntryError::NoReactImport)?;

    let line_start = content[..at].rfind('\n').map_or(0, |i| i + 1);
    let line_end = content[at..].find('\n').map_or(content.len(), |i| at + i);
    let line = content[line_start..line_end].trim_end_matches('\r');

    Ok(PatchDirective::insert_after(
        line,
        format!("{}{CODE_PUSH_IMPORT}", line_ending(content)),
    ))
}
