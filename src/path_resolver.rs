use crate::client::{AssetDatabase, Element};

/// Characters accepted between root path segments on the command line. The
/// display side always renders `\`.
pub const PATH_DELIMITERS: &[char] = &['\\', '/'];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathResolution {
    Resolved(Element),
    /// Zero or ambiguous matches for the named segment. Resolution stops at
    /// the first bad segment; no partial result is handed downstream.
    Invalid {
        segment: String,
    },
}

/// Walks a delimited root path against the server hierarchy. The first
/// segment must match exactly one element anywhere in the database; each
/// following segment must match exactly one direct child of the element
/// resolved so far. Empty segments (leading, trailing or doubled
/// delimiters) are skipped.
///
/// External lookup failures propagate; missing or ambiguous segments come
/// back as `PathResolution::Invalid`.
pub fn resolve_root_path(
    db: &dyn AssetDatabase,
    path: &str,
    delimiters: &[char],
) -> anyhow::Result<PathResolution> {
    let segments: Vec<&str> = path
        .split(delimiters)
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        return Ok(PathResolution::Invalid {
            segment: path.to_string(),
        });
    }

    let mut current: Option<Element> = None;
    for segment in segments {
        // Limit 2 is enough to tell "exactly one" from "ambiguous" without
        // pulling the full match list.
        let matches = db.find_elements(
            current.as_ref().map(|element| &element.id),
            segment,
            false,
            Some(2),
        )?;
        if matches.len() != 1 {
            tracing::debug!(segment, count = matches.len(), "root path segment did not resolve");
            return Ok(PathResolution::Invalid {
                segment: segment.to_string(),
            });
        }
        current = matches.into_iter().next();
    }

    // Loop ran at least once, so current is set.
    match current {
        Some(element) => Ok(PathResolution::Resolved(element)),
        None => Ok(PathResolution::Invalid {
            segment: path.to_string(),
        }),
    }
}
