use crate::analysis_matcher;
use crate::client::{Analysis, AnalysisId, AssetDatabase, CalculationMode, ElementTemplate};
use crate::element_filter;
use crate::path_format;
use crate::path_resolver::{self, PATH_DELIMITERS, PathResolution};
use crate::report::{PathStyle, Reporter};
use crate::time_range::TimeRange;

/// Workflow stages, in order. Terminal states are carried by `Outcome`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Validating,
    ResolvingTargets,
    ResolvingAnalyses,
    AwaitingConfirmation,
    Submitting,
}

fn enter(stage: Stage) {
    tracing::debug!(?stage, "entering stage");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    InvalidTimeRange,
    InvalidPath,
    NoMatchingTemplates,
    NoMatchingElements,
    NoMatchingAnalyses,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Submitted { queued: usize },
    /// Confirmed, but every matched analysis was disabled; no external call
    /// is made.
    NothingToSubmit,
    Declined,
    Aborted(AbortReason),
}

pub const AFFIRMATIVE_ANSWERS: &[&str] = &["y", "yes", "uh huh"];

pub fn is_affirmative(answer: &str) -> bool {
    let normalized = answer.trim().to_lowercase();
    AFFIRMATIVE_ANSWERS.contains(&normalized.as_str())
}

pub struct CalculationRequest {
    pub root_path: Option<String>,
    pub element_mask: String,
    pub template_mask: Option<String>,
    pub analysis_mask: String,
    pub full_hierarchy: bool,
    pub start: String,
    pub end: String,
    pub mode: CalculationMode,
}

/// Backfill/recalculate run: validate the range, resolve targets and
/// analyses, confirm interactively, submit once. Every validation failure
/// aborts the invocation; nothing is retried.
pub fn run_calculation(
    db: &dyn AssetDatabase,
    reporter: &mut dyn Reporter,
    request: &CalculationRequest,
) -> anyhow::Result<Outcome> {
    enter(Stage::Validating);
    let range = match TimeRange::parse(&request.start, &request.end) {
        Ok(range) => range,
        Err(err) => {
            reporter.error(&format!("Invalid time range: {err}."));
            return Ok(Outcome::Aborted(AbortReason::InvalidTimeRange));
        }
    };

    enter(Stage::ResolvingTargets);
    let templates: Option<Vec<ElementTemplate>> = match &request.template_mask {
        Some(mask) => {
            let found = db.find_element_templates(mask)?;
            if found.is_empty() {
                reporter.error("No matching element templates found.");
                return Ok(Outcome::Aborted(AbortReason::NoMatchingTemplates));
            }
            Some(found)
        }
        None => None,
    };

    let root = match &request.root_path {
        Some(path) => match path_resolver::resolve_root_path(db, path, PATH_DELIMITERS)? {
            PathResolution::Resolved(element) => Some(element),
            PathResolution::Invalid { segment } => {
                reporter.error(&format!("Invalid root path at '{segment}'."));
                return Ok(Outcome::Aborted(AbortReason::InvalidPath));
            }
        },
        None => None,
    };

    let mut elements = element_filter::filter_elements(
        db,
        root.as_ref(),
        &request.element_mask,
        request.full_hierarchy,
    )?;
    if let Some(templates) = &templates {
        elements = element_filter::restrict_to_templates(elements, templates);
    }
    if elements.is_empty() {
        reporter.error("No matching elements found.");
        return Ok(Outcome::Aborted(AbortReason::NoMatchingElements));
    }

    enter(Stage::ResolvingAnalyses);
    let analyses = analysis_matcher::find_analyses_targeting(db, &elements, &request.analysis_mask)?;
    if analyses.is_empty() {
        reporter.error("No matching analyses found.");
        return Ok(Outcome::Aborted(AbortReason::NoMatchingAnalyses));
    }

    enter(Stage::AwaitingConfirmation);
    let enabled: Vec<&Analysis> = analyses
        .iter()
        .filter(|analysis| analysis.status.is_enabled())
        .collect();
    let has_disabled = enabled.len() != analyses.len();

    if range.is_unbounded() {
        reporter.warning("Please verify that this is the correct time range:");
    }
    reporter.detail("Time Range", &range.to_string());

    reporter.success(&format!(
        "Found {} analyses matching search criteria:",
        analyses.len()
    ));
    for analysis in &analyses {
        let path = path_format::analysis_path(db, analysis)?;
        let style = if analysis.status.is_enabled() {
            PathStyle::Normal
        } else {
            PathStyle::Dimmed
        };
        reporter.path(&path, style);
    }
    if has_disabled {
        reporter.warning(&format!(
            "Analyses printed in yellow are not enabled, and will not be {}.",
            request.mode.past()
        ));
    }

    let prompt = format!(
        "Continue with {} of {} analyses? Y/N: ",
        request.mode.noun(),
        enabled.len()
    );
    let answer = reporter.prompt_line(&prompt)?;
    if !is_affirmative(&answer) {
        reporter.error(&format!("No analyses will be {}.", request.mode.past()));
        return Ok(Outcome::Declined);
    }

    enter(Stage::Submitting);
    if enabled.is_empty() {
        reporter.warning(&format!(
            "No enabled analyses to be {}.",
            request.mode.past()
        ));
        return Ok(Outcome::NothingToSubmit);
    }
    reporter.success(&format!(
        "{} {} analyses...",
        request.mode.participle(),
        enabled.len()
    ));
    let ids: Vec<AnalysisId> = enabled.iter().map(|analysis| analysis.id.clone()).collect();
    db.queue_calculation(&ids, &range, request.mode)?;
    Ok(Outcome::Submitted { queued: ids.len() })
}

/// Tag-inputs run: scan every analysis' resolved outputs for the named
/// time-series point and report the writers. Returns the hit count so the
/// caller can pick an exit code.
pub fn run_find_tag_inputs(
    db: &dyn AssetDatabase,
    reporter: &mut dyn Reporter,
    tag_name: &str,
) -> anyhow::Result<usize> {
    let writers = analysis_matcher::find_analyses_writing_to_tag(db, tag_name)?;
    match writers.len() {
        0 => reporter.warning(&format!("No analyses writing to '{tag_name}'.")),
        1 => reporter.success(&format!("One analysis writing to '{tag_name}':")),
        // More than one analysis writing the same tag usually means a
        // misconfiguration, hence the louder styling.
        count => reporter.error(&format!("{count} analyses writing to '{tag_name}':")),
    }
    for analysis in &writers {
        let path = path_format::analysis_path(db, analysis)?;
        reporter.path(&path, PathStyle::Normal);
    }
    Ok(writers.len())
}
