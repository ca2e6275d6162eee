use std::collections::HashSet;

use crate::client::{AssetDatabase, Element, ElementTemplate, TemplateId};

/// Elements matching `name_mask` under `root`, or across the whole database
/// when no root is given. `recurse_full_hierarchy` widens a rooted search
/// from direct children to all descendants.
///
/// The result is sorted by name ascending and free of duplicates regardless
/// of what ordering the collaborator provides; stage output feeds display
/// and has to be reproducible.
pub fn filter_elements(
    db: &dyn AssetDatabase,
    root: Option<&Element>,
    name_mask: &str,
    recurse_full_hierarchy: bool,
) -> anyhow::Result<Vec<Element>> {
    let mut elements = db.find_elements(
        root.map(|element| &element.id),
        name_mask,
        recurse_full_hierarchy,
        None,
    )?;
    elements.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    elements.dedup_by(|a, b| a.id == b.id);
    Ok(elements)
}

/// Keeps only candidates whose assigned template is one of `templates`.
/// Identity comparison on the template, not name comparison; two templates
/// may share a name in different contexts.
pub fn restrict_to_templates(
    candidates: Vec<Element>,
    templates: &[ElementTemplate],
) -> Vec<Element> {
    let wanted: HashSet<&TemplateId> = templates.iter().map(|template| &template.id).collect();
    candidates
        .into_iter()
        .filter(|element| {
            element
                .template
                .as_ref()
                .is_some_and(|template| wanted.contains(template))
        })
        .collect()
}
