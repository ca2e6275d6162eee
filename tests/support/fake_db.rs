#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use analysis_admin::client::{
    Analysis, AnalysisId, AnalysisStatus, AssetDatabase, CalculationMode, Element, ElementId,
    ElementTemplate, OutputBinding, TemplateId,
};
use analysis_admin::path_format::AnalysisPath;
use analysis_admin::report::{PathStyle, Reporter};
use analysis_admin::time_range::TimeRange;

#[derive(Clone, Debug)]
pub struct QueuedCalculation {
    pub analyses: Vec<AnalysisId>,
    pub range: TimeRange,
    pub mode: CalculationMode,
}

/// In-memory stand-in for the asset server. Holds a flat element list with
/// parent references and answers the same queries the web API would.
#[derive(Default)]
pub struct FakeAssetDatabase {
    pub elements: Vec<Element>,
    pub templates: Vec<ElementTemplate>,
    pub analyses: Vec<Analysis>,
    pub outputs: HashMap<AnalysisId, Vec<OutputBinding>>,
    pub queued: RefCell<Vec<QueuedCalculation>>,
}

impl FakeAssetDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(
        &mut self,
        id: &str,
        name: &str,
        parent: Option<&str>,
        template: Option<&str>,
    ) -> ElementId {
        let element_id = ElementId::new(id);
        self.elements.push(Element {
            id: element_id.clone(),
            name: name.to_string(),
            parent: parent.map(ElementId::new),
            template: template.map(TemplateId::new),
        });
        element_id
    }

    pub fn add_template(&mut self, id: &str, name: &str) {
        self.templates.push(ElementTemplate {
            id: TemplateId::new(id),
            name: name.to_string(),
        });
    }

    pub fn add_analysis(
        &mut self,
        id: &str,
        name: &str,
        target: &str,
        status: AnalysisStatus,
    ) -> AnalysisId {
        let analysis_id = AnalysisId::new(id);
        self.analyses.push(Analysis {
            id: analysis_id.clone(),
            name: name.to_string(),
            target: ElementId::new(target),
            status,
        });
        analysis_id
    }

    pub fn set_outputs(&mut self, analysis: &str, outputs: Vec<OutputBinding>) {
        self.outputs.insert(AnalysisId::new(analysis), outputs);
    }
}

/// Case-insensitive `*`/`?` wildcard match, the syntax the asset server uses
/// for name masks.
pub fn mask_matches(mask: &str, name: &str) -> bool {
    fn matches(mask: &[char], name: &[char]) -> bool {
        match mask.split_first() {
            None => name.is_empty(),
            Some((&'*', rest)) => {
                matches(rest, name) || (!name.is_empty() && matches(mask, &name[1..]))
            }
            Some((&'?', rest)) => !name.is_empty() && matches(rest, &name[1..]),
            Some((&expected, rest)) => match name.split_first() {
                Some((&actual, tail)) => expected == actual && matches(rest, tail),
                None => false,
            },
        }
    }
    let mask: Vec<char> = mask.to_lowercase().chars().collect();
    let name: Vec<char> = name.to_lowercase().chars().collect();
    matches(&mask, &name)
}

impl AssetDatabase for FakeAssetDatabase {
    fn server_name(&self) -> &str {
        "fake-server"
    }

    fn database_name(&self) -> &str {
        "fake-db"
    }

    fn find_elements(
        &self,
        root: Option<&ElementId>,
        name_mask: &str,
        recurse: bool,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<Element>> {
        let mut found: Vec<Element> = match root {
            None => self
                .elements
                .iter()
                .filter(|element| mask_matches(name_mask, &element.name))
                .cloned()
                .collect(),
            Some(root_id) if recurse => {
                let mut result = Vec::new();
                let mut frontier = vec![root_id.clone()];
                while let Some(current) = frontier.pop() {
                    for child in self
                        .elements
                        .iter()
                        .filter(|element| element.parent.as_ref() == Some(&current))
                    {
                        frontier.push(child.id.clone());
                        if mask_matches(name_mask, &child.name) {
                            result.push(child.clone());
                        }
                    }
                }
                result
            }
            Some(root_id) => self
                .elements
                .iter()
                .filter(|element| {
                    element.parent.as_ref() == Some(root_id)
                        && mask_matches(name_mask, &element.name)
                })
                .cloned()
                .collect(),
        };
        found.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(limit) = limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    fn find_element_templates(&self, name_mask: &str) -> anyhow::Result<Vec<ElementTemplate>> {
        let mut found: Vec<ElementTemplate> = self
            .templates
            .iter()
            .filter(|template| mask_matches(name_mask, &template.name))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    fn find_analyses(&self, name_mask: Option<&str>) -> anyhow::Result<Vec<Analysis>> {
        let mut found: Vec<Analysis> = self
            .analyses
            .iter()
            .filter(|analysis| {
                name_mask.is_none_or(|mask| mask_matches(mask, &analysis.name))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    fn element_by_id(&self, id: &ElementId) -> anyhow::Result<Option<Element>> {
        Ok(self
            .elements
            .iter()
            .find(|element| &element.id == id)
            .cloned())
    }

    fn resolved_outputs(&self, analysis: &AnalysisId) -> anyhow::Result<Vec<OutputBinding>> {
        Ok(self.outputs.get(analysis).cloned().unwrap_or_default())
    }

    fn queue_calculation(
        &self,
        analyses: &[AnalysisId],
        range: &TimeRange,
        mode: CalculationMode,
    ) -> anyhow::Result<()> {
        self.queued.borrow_mut().push(QueuedCalculation {
            analyses: analyses.to_vec(),
            range: *range,
            mode,
        });
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Info,
    Success,
    Warning,
    Error,
    Path,
    PathDimmed,
    Prompt,
}

/// Records every reporter call and feeds canned confirmation answers. An
/// exhausted answer queue declines, so "never prompts" tests stay safe.
#[derive(Default)]
pub struct ScriptedReporter {
    pub lines: Vec<(LineKind, String)>,
    answers: VecDeque<String>,
}

impl ScriptedReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answers: &[&str]) -> Self {
        Self {
            lines: Vec::new(),
            answers: answers.iter().map(|answer| answer.to_string()).collect(),
        }
    }

    pub fn prompted(&self) -> bool {
        self.lines.iter().any(|(kind, _)| *kind == LineKind::Prompt)
    }

    pub fn contains(&self, kind: LineKind, needle: &str) -> bool {
        self.lines
            .iter()
            .any(|(line_kind, text)| *line_kind == kind && text.contains(needle))
    }

    pub fn paths(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(kind, _)| matches!(kind, LineKind::Path | LineKind::PathDimmed))
            .map(|(_, text)| text.as_str())
            .collect()
    }
}

impl Reporter for ScriptedReporter {
    fn info(&mut self, message: &str) {
        self.lines.push((LineKind::Info, message.to_string()));
    }

    fn success(&mut self, message: &str) {
        self.lines.push((LineKind::Success, message.to_string()));
    }

    fn warning(&mut self, message: &str) {
        self.lines.push((LineKind::Warning, message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.lines.push((LineKind::Error, message.to_string()));
    }

    fn detail(&mut self, label: &str, value: &str) {
        self.lines.push((LineKind::Info, format!("{label}: {value}")));
    }

    fn path(&mut self, path: &AnalysisPath, style: PathStyle) {
        let kind = match style {
            PathStyle::Normal => LineKind::Path,
            PathStyle::Dimmed => LineKind::PathDimmed,
        };
        self.lines.push((kind, path.to_string()));
    }

    fn prompt_line(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.lines.push((LineKind::Prompt, prompt.to_string()));
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}
