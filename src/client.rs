use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time_range::TimeRange;

/// Opaque identity of an element on the asset server.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(String);

impl ElementId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TemplateId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AnalysisId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One node of the externally-owned asset hierarchy, as returned by a query.
/// The tool never builds its own graph out of these; parents are looked up
/// through the collaborator when a display path is needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    pub name: String,
    pub parent: Option<ElementId>,
    pub template: Option<TemplateId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementTemplate {
    pub id: TemplateId,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisStatus {
    Enabled,
    Disabled,
    Suspended,
    Error,
}

impl AnalysisStatus {
    pub fn is_enabled(self) -> bool {
        matches!(self, AnalysisStatus::Enabled)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Analysis {
    pub id: AnalysisId,
    pub name: String,
    pub target: ElementId,
    pub status: AnalysisStatus,
}

/// A resolved analysis output. Point resolution happens server-side; a
/// binding whose underlying time-series point is not provisioned comes back
/// as `ResolveFailed` with the server's reason text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputBinding {
    Point(String),
    Unbound,
    ResolveFailed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalculationMode {
    FillGaps,
    DeleteAndRecompute,
}

impl CalculationMode {
    /// Noun used in prompts: "Continue with backfill of ...".
    pub fn noun(self) -> &'static str {
        match self {
            CalculationMode::FillGaps => "backfill",
            CalculationMode::DeleteAndRecompute => "recalculation",
        }
    }

    /// Present participle used in progress output.
    pub fn participle(self) -> &'static str {
        match self {
            CalculationMode::FillGaps => "Backfilling",
            CalculationMode::DeleteAndRecompute => "Recalculating",
        }
    }

    /// Past participle used in decline/no-op output.
    pub fn past(self) -> &'static str {
        match self {
            CalculationMode::FillGaps => "backfilled",
            CalculationMode::DeleteAndRecompute => "recalculated",
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            CalculationMode::FillGaps => "fill-gaps",
            CalculationMode::DeleteAndRecompute => "delete-and-recompute",
        }
    }
}

/// Read-plus-queue surface of the external asset database. Element and
/// analysis data stays owned by the server; every method is one blocking
/// round-trip and results are plain values.
///
/// `find_elements` and `find_analyses` return results sorted by name
/// ascending. Name masks use the server's wildcard syntax and are passed
/// through unreinterpreted.
pub trait AssetDatabase {
    fn server_name(&self) -> &str;

    fn database_name(&self) -> &str;

    fn find_elements(
        &self,
        root: Option<&ElementId>,
        name_mask: &str,
        recurse: bool,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<Element>>;

    fn find_element_templates(&self, name_mask: &str) -> anyhow::Result<Vec<ElementTemplate>>;

    /// All analyses whose name matches the mask, across the whole database.
    /// `None` matches every analysis.
    fn find_analyses(&self, name_mask: Option<&str>) -> anyhow::Result<Vec<Analysis>>;

    fn element_by_id(&self, id: &ElementId) -> anyhow::Result<Option<Element>>;

    fn resolved_outputs(&self, analysis: &AnalysisId) -> anyhow::Result<Vec<OutputBinding>>;

    /// Queue a bulk calculation on the server. Fire-and-forget: the server
    /// owns execution, progress and failure handling.
    fn queue_calculation(
        &self,
        analyses: &[AnalysisId],
        range: &TimeRange,
        mode: CalculationMode,
    ) -> anyhow::Result<()>;
}
