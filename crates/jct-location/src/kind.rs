/// Semantic category of a file, with a canonical filename suffix used for
/// extension-based matching (see `Container::list` in `jct-vfs`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Source,
    Class,
    Html,
    Other,
}

impl Kind {
    /// The canonical extension for this kind, including the leading dot.
    ///
    /// `Kind::Other` has no canonical extension: it matches "anything else"
    /// and round-trips through binary-name conversion as an empty suffix.
    pub const fn extension(self) -> &'static str {
        match self {
            Kind::Source => ".java",
            Kind::Class => ".class",
            Kind::Html => ".html",
            Kind::Other => "",
        }
    }

    /// Infer a `Kind` from a file extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Kind {
        match ext {
            "java" => Kind::Source,
            "class" => Kind::Class,
            "html" | "htm" => Kind::Html,
            _ => Kind::Other,
        }
    }

    pub const ALL: [Kind; 4] = [Kind::Source, Kind::Class, Kind::Html, Kind::Other];
}
