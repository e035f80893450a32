//! Node lookup within the course tree.

use crate::model::Page;

/// Path segment that stands for "beginning of the course".
pub const START_MARKER: &str = "__start";

/// Requested section of a course.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// First page with content.
    Start,
    /// Page with the given path.
    Path(String),
}

impl Target {
    /// Parse a request path segment.
    pub fn parse(segment: &str) -> Self {
        if segment == START_MARKER {
            Self::Start
        } else {
            Self::Path(segment.to_owned())
        }
    }
}

/// Find a page by path.
///
/// Direct children are checked first, in order; on duplicate sibling paths
/// the first one wins. Otherwise each child that has children is searched
/// recursively, left to right, and the first hit is returned.
///
/// Returns `None` if no page in the tree carries `target`.
pub fn locate<'a>(target: &str, nodes: &'a [Page]) -> Option<&'a Page> {
    if let Some(page) = nodes.iter().find(|page| page.path == target) {
        return Some(page);
    }

    nodes
        .iter()
        .filter(|page| page.has_children())
        .find_map(|page| locate(target, &page.children))
}

/// Resolve the start of the course.
///
/// Begins at the first top-level page and, while the current page has an
/// empty body and children, moves to its first child. `max_depth` bounds the
/// number of such hops; `None` follows the chain to the end.
///
/// Returns `None` for an empty course.
pub fn start_page(nodes: &[Page], max_depth: Option<usize>) -> Option<&Page> {
    let mut page = nodes.first()?;
    let mut hops = 0;

    while !page.has_body() && max_depth.is_none_or(|max| hops < max) {
        let Some(child) = page.children.first() else {
            break;
        };
        page = child;
        hops += 1;
    }

    Some(page)
}
