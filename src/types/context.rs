#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    File,
    Folder,
    Code,
}

/// Entry in the "add context" picker. Display only; never resolved on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFileReference {
    pub name: String,
    pub kind: ContextKind,
    pub language: Option<String>,
    pub path: Option<String>,
}

impl ContextFileReference {
    fn new(name: &str, kind: ContextKind, language: Option<&str>, path: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            language: language.map(str::to_string),
            path: path.map(str::to_string),
        }
    }

    pub fn label(&self) -> String {
        let glyph = match self.kind {
            ContextKind::File => "▤",
            ContextKind::Folder => "▸",
            ContextKind::Code => "{}",
        };
        match &self.path {
            Some(path) => format!("{glyph} {} ({path})", self.name),
            None => format!("{glyph} {}", self.name),
        }
    }
}

pub fn mock_context_files() -> Vec<ContextFileReference> {
    vec![
        ContextFileReference::new(
            "main.ts",
            ContextKind::File,
            Some("typescript"),
            Some("src/main.ts"),
        ),
        ContextFileReference::new(
            "vite.config.ts",
            ContextKind::File,
            Some("typescript"),
            Some("vite.config.ts"),
        ),
        ContextFileReference::new(
            "scraping.html",
            ContextKind::File,
            Some("html"),
            Some("src/scraping/scraping.html"),
        ),
        ContextFileReference::new("helpers", ContextKind::Folder, None, Some("src/helpers")),
        ContextFileReference::new("loadFile()", ContextKind::Code, Some("typescript"), None),
    ]
}
