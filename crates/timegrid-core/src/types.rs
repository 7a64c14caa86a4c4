use serde::{Deserialize, Serialize};

/// How concurrent timed events share a day column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapType {
    /// Side-by-side columns, no two events in a column intersect
    #[default]
    NoOverlap,
    /// Cascading container/row/leaf layout with partial visual overlap
    Overlap,
}

impl OverlapType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoOverlap => "no-overlap",
            Self::Overlap => "overlap",
        }
    }
}

impl std::fmt::Display for OverlapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
