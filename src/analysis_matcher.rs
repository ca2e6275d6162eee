use crate::client::{Analysis, AssetDatabase, Element, OutputBinding};

/// Analyses whose name matches the mask and whose target is one of
/// `elements`, accumulated in element order (name order within an element
/// comes from the collaborator's sort). No deduplication happens here: an
/// analysis targets exactly one element, so the concatenation cannot repeat
/// one.
pub fn find_analyses_targeting(
    db: &dyn AssetDatabase,
    elements: &[Element],
    analysis_name_mask: &str,
) -> anyhow::Result<Vec<Analysis>> {
    let candidates = db.find_analyses(Some(analysis_name_mask))?;
    let mut matched = Vec::new();
    for element in elements {
        matched.extend(
            candidates
                .iter()
                .filter(|analysis| analysis.target == element.id)
                .cloned(),
        );
    }
    Ok(matched)
}

/// Every analysis in the database with at least one resolved output bound to
/// a time-series point named exactly `tag_name`. An analysis appears at most
/// once even when several of its outputs hit the tag.
///
/// Bindings whose point failed to resolve (not provisioned on the archive
/// yet) never match and never abort the scan; they are only visible in the
/// debug log.
pub fn find_analyses_writing_to_tag(
    db: &dyn AssetDatabase,
    tag_name: &str,
) -> anyhow::Result<Vec<Analysis>> {
    let all = db.find_analyses(None)?;
    let mut writers = Vec::new();
    for analysis in all {
        let outputs = db.resolved_outputs(&analysis.id)?;
        let mut hit = false;
        for output in &outputs {
            match output {
                OutputBinding::Point(name) => {
                    if name == tag_name {
                        hit = true;
                    }
                }
                OutputBinding::Unbound => {}
                OutputBinding::ResolveFailed(reason) => {
                    tracing::debug!(
                        analysis = %analysis.name,
                        reason = %reason,
                        "skipping output binding with unresolved point"
                    );
                }
            }
        }
        if hit {
            writers.push(analysis);
        }
    }
    Ok(writers)
}
