use std::fmt;

use anyhow::anyhow;

use crate::client::{Analysis, AssetDatabase};

/// Display path of an analysis: the target's ancestor chain root-to-leaf,
/// then the target, then the analysis name. Kept structured so the console
/// reporter can style separators and segments independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisPath {
    pub ancestors: Vec<String>,
    pub target: String,
    pub analysis: String,
}

impl fmt::Display for AnalysisPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ancestor in &self.ancestors {
            write!(f, "{ancestor}\\")?;
        }
        write!(f, "{}|{}", self.target, self.analysis)
    }
}

/// Walks the target's parent chain through the collaborator and reverses it
/// into root-to-leaf order. The display separator is always `\`, whatever
/// delimiter style the input path used.
pub fn analysis_path(db: &dyn AssetDatabase, analysis: &Analysis) -> anyhow::Result<AnalysisPath> {
    let target = db
        .element_by_id(&analysis.target)?
        .ok_or_else(|| anyhow!("analysis '{}' targets unknown element {}", analysis.name, analysis.target))?;

    let mut ancestors = Vec::new();
    let mut cursor = target.parent.clone();
    while let Some(parent_id) = cursor {
        let parent = db
            .element_by_id(&parent_id)?
            .ok_or_else(|| anyhow!("element {} has unknown parent {}", target.name, parent_id))?;
        ancestors.push(parent.name.clone());
        cursor = parent.parent;
    }
    ancestors.reverse();

    Ok(AnalysisPath {
        ancestors,
        target: target.name,
        analysis: analysis.name.clone(),
    })
}
