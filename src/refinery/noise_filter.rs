// * Noise Filter
// * Works on a detached clone of the container, so a partial clean can never touch the live page.
// * Removal is absolute: anything in the noise taxonomy goes, whatever its size.

use crate::dom;
use crate::refinery::taxonomy::FILTER_NOISE_SELECTOR;
use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use tracing::debug;

/// A detached copy of a container, re-parsed as an HTML fragment
pub struct ContainerClone {
    pub fragment: Html,
    pub container: NodeId,
}

/// Clones the container element into a fresh fragment tree.
///
/// Returns `None` when the id no longer refers to an element.
pub fn clone_container(document: &Html, container: NodeId) -> Option<ContainerClone> {
    let element = dom::element_ref(document, container)?;
    let fragment = Html::parse_fragment(&element.html());

    // * The fragment root is a synthetic <html>; the container is its first element child
    let container = fragment
        .root_element()
        .children()
        .find_map(ElementRef::wrap)?
        .id();

    Some(ContainerClone {
        fragment,
        container,
    })
}

/// Removes every noise descendant from the clone and returns it.
///
/// The container element itself is never removed, only its descendants.
pub fn clean(mut clone: ContainerClone) -> ContainerClone {
    let doomed: Vec<NodeId> = match dom::element_ref(&clone.fragment, clone.container) {
        Some(container) => container
            .select(&FILTER_NOISE_SELECTOR)
            .map(|e| e.id())
            .collect(),
        None => return clone,
    };

    debug!(removed = doomed.len(), "noise elements stripped from container clone");
    for id in doomed {
        dom::detach(&mut clone.fragment.tree, id);
    }
    clone
}
