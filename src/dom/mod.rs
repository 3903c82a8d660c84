// * Live Document Mutation Helpers
// * `scraper::Html` exposes its `ego_tree` arena; every edit here goes through that tree.
// * Detached nodes remain in the arena but are unreachable from the root.

pub mod text;

use ego_tree::{NodeId, NodeRef, Tree};
use html5ever::tendril::StrTendril;
use html5ever::{namespace_url, ns, Attribute, LocalName, QualName};
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

static SELECTOR_BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid body selector"));

/// Concatenated text of a node and all its descendants
pub fn text_content(node: NodeRef<'_, Node>) -> String {
    node.descendants()
        .filter_map(|n| n.value().as_text().map(|t| &**t))
        .collect()
}

/// Trimmed text of the element with the given id, if it still exists
pub fn element_text(document: &Html, id: NodeId) -> Option<String> {
    document
        .tree
        .get(id)
        .map(|n| text_content(n).trim().to_string())
}

/// Wraps a node id as an element reference when it is still an element
pub fn element_ref(document: &Html, id: NodeId) -> Option<ElementRef<'_>> {
    document.tree.get(id).and_then(ElementRef::wrap)
}

/// True when the element itself or any ancestor element matches the selector
pub fn closest(element: ElementRef<'_>, selector: &Selector) -> bool {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .any(|e| selector.matches(&e))
}

/// True when a node is still attached to the document root
pub fn is_attached(document: &Html, id: NodeId) -> bool {
    let root = document.tree.root().id();
    match document.tree.get(id) {
        Some(node) => node.id() == root || node.ancestors().any(|a| a.id() == root),
        None => false,
    }
}

/// Returns the `<body>` element id, falling back to the root element
pub fn body_id(document: &Html) -> NodeId {
    select_attached(document, &SELECTOR_BODY)
        .next()
        .map(|b| b.id())
        .unwrap_or_else(|| document.root_element().id())
}

/// Finds an attached element by its `id` attribute
pub fn element_by_id(document: &Html, id_attr: &str) -> Option<NodeId> {
    document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().id() == Some(id_attr))
        .map(|e| e.id())
}

/// Attached elements matching the selector, in document order.
///
/// `Html::select` scans the whole arena, so detached subtrees would match too.
pub fn select_attached<'a>(
    document: &'a Html,
    selector: &'a Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |e| selector.matches(e))
}

/// Ids of all attached elements matching the selector, in document order
pub fn select_ids(document: &Html, selector: &Selector) -> Vec<NodeId> {
    select_attached(document, selector).map(|e| e.id()).collect()
}

/// Rebuilds the arena from the attached tree, dropping every detached node.
///
/// Node ids are reassigned, so ids held from before the call are invalid afterwards.
/// Returns how many nodes were reclaimed.
pub fn compact(document: &mut Html) -> usize {
    let before = document.tree.nodes().count();
    let root = document.tree.root();
    let attached = root.descendants().count();
    if attached == before {
        return 0;
    }

    let mut tree = Tree::with_capacity(root.value().clone(), attached);
    let target = tree.root().id();
    copy_children(root, &mut tree, target);
    document.tree = tree;
    before - attached
}

fn copy_children(source: NodeRef<'_, Node>, tree: &mut Tree<Node>, parent: NodeId) {
    for child in source.children() {
        let copied = match tree.get_mut(parent) {
            Some(mut node) => node.append(child.value().clone()).id(),
            None => return,
        };
        copy_children(child, tree, copied);
    }
}

fn html_name(tag: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(tag))
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: StrTendril::from(value),
    }
}

/// Builds a detached HTML element value
pub fn new_element(tag: &str, attrs: &[(&str, &str)]) -> Node {
    let attrs = attrs.iter().map(|(k, v)| attribute(k, v)).collect();
    Node::Element(Element::new(html_name(tag), attrs))
}

/// Builds a detached text node value
pub fn new_text(text: &str) -> Node {
    Node::Text(Text {
        text: StrTendril::from(text),
    })
}

/// Appends a new element under `parent` and returns its id
pub fn append_element(
    tree: &mut Tree<Node>,
    parent: NodeId,
    tag: &str,
    attrs: &[(&str, &str)],
) -> Option<NodeId> {
    let mut parent = tree.get_mut(parent)?;
    Some(parent.append(new_element(tag, attrs)).id())
}

/// Appends a text node under `parent`
pub fn append_text(tree: &mut Tree<Node>, parent: NodeId, text: &str) -> Option<NodeId> {
    let mut parent = tree.get_mut(parent)?;
    Some(parent.append(new_text(text)).id())
}

/// Appends an element holding a single text child
pub fn append_text_element(
    tree: &mut Tree<Node>,
    parent: NodeId,
    tag: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> Option<NodeId> {
    let id = append_element(tree, parent, tag, attrs)?;
    append_text(tree, id, text)?;
    Some(id)
}

/// Detaches a node from its parent; a no-op for already detached nodes
pub fn detach(tree: &mut Tree<Node>, id: NodeId) {
    if let Some(mut node) = tree.get_mut(id) {
        node.detach();
    }
}

/// Detaches every child of `parent`
pub fn clear_children(tree: &mut Tree<Node>, parent: NodeId) {
    let children: Vec<NodeId> = match tree.get(parent) {
        Some(node) => node.children().map(|c| c.id()).collect(),
        None => return,
    };
    for child in children {
        detach(tree, child);
    }
}

/// Replaces a node with a plain text node carrying `text`
pub fn replace_with_text(tree: &mut Tree<Node>, id: NodeId, text: &str) {
    let has_parent = tree.get(id).and_then(|n| n.parent()).is_some();
    if !has_parent {
        return;
    }
    if let Some(mut node) = tree.get_mut(id) {
        node.insert_before(new_text(text));
        node.detach();
    }
}

/// Merges every run of adjacent sibling text nodes under `root` into its first node
pub fn merge_adjacent_text_nodes(tree: &mut Tree<Node>, root: NodeId) -> usize {
    let text_ids: Vec<NodeId> = match tree.get(root) {
        Some(node) => node
            .descendants()
            .filter(|n| n.value().is_text())
            .map(|n| n.id())
            .collect(),
        None => return 0,
    };

    let mut merged = 0;
    for id in text_ids {
        loop {
            let Some(node) = tree.get(id) else { break };
            // * Already folded into an earlier sibling
            if node.parent().is_none() {
                break;
            }
            let Some(next) = node.next_sibling() else { break };
            let Some(next_text) = next.value().as_text() else { break };
            let extra = next_text.text.to_string();
            let next_id = next.id();

            detach(tree, next_id);
            if let Some(mut node) = tree.get_mut(id) {
                if let Node::Text(text) = node.value() {
                    text.text.push_slice(&extra);
                }
            }
            merged += 1;
        }
    }
    merged
}

// * Attribute edits rebuild the element so scraper's cached id/class lookups stay coherent
fn rewrite_attrs<F>(tree: &mut Tree<Node>, id: NodeId, edit: F) -> bool
where
    F: FnOnce(&mut Vec<(String, String)>),
{
    let Some(mut node) = tree.get_mut(id) else {
        return false;
    };
    let Node::Element(element) = node.value() else {
        return false;
    };

    let tag = element.name().to_string();
    let mut attrs: Vec<(String, String)> = element
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    edit(&mut attrs);

    let attrs = attrs.iter().map(|(k, v)| attribute(k, v)).collect();
    *node.value() = Node::Element(Element::new(html_name(&tag), attrs));
    true
}

/// Reads an attribute of the element with the given id
pub fn get_attr(document: &Html, id: NodeId, name: &str) -> Option<String> {
    element_ref(document, id).and_then(|e| e.value().attr(name).map(str::to_string))
}

/// Sets (or overwrites) an attribute
pub fn set_attr(tree: &mut Tree<Node>, id: NodeId, name: &str, value: &str) -> bool {
    rewrite_attrs(tree, id, |attrs| {
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    })
}

/// Removes an attribute when present
pub fn remove_attr(tree: &mut Tree<Node>, id: NodeId, name: &str) -> bool {
    rewrite_attrs(tree, id, |attrs| attrs.retain(|(k, _)| k != name))
}

/// True when the element carries the class
pub fn has_class(document: &Html, id: NodeId, class: &str) -> bool {
    element_ref(document, id)
        .map(|e| e.value().classes().any(|c| c == class))
        .unwrap_or(false)
}

/// Adds a class to the element's class list
pub fn add_class(tree: &mut Tree<Node>, id: NodeId, class: &str) -> bool {
    rewrite_attrs(tree, id, |attrs| {
        match attrs.iter_mut().find(|(k, _)| k == "class") {
            Some(slot) => {
                if !slot.1.split_whitespace().any(|c| c == class) {
                    slot.1 = if slot.1.trim().is_empty() {
                        class.to_string()
                    } else {
                        format!("{} {}", slot.1.trim(), class)
                    };
                }
            }
            None => attrs.push(("class".to_string(), class.to_string())),
        }
    })
}

/// Removes the listed classes; an emptied class attribute is dropped entirely
pub fn remove_classes(tree: &mut Tree<Node>, id: NodeId, classes: &[&str]) -> bool {
    rewrite_attrs(tree, id, |attrs| {
        if let Some(slot) = attrs.iter_mut().find(|(k, _)| k == "class") {
            slot.1 = slot
                .1
                .split_whitespace()
                .filter(|c| !classes.contains(c))
                .collect::<Vec<_>>()
                .join(" ");
        }
        attrs.retain(|(k, v)| k != "class" || !v.is_empty());
    })
}

/// Parses an inline style attribute into ordered `(property, value)` pairs
pub fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            let value = value.trim();
            (!prop.is_empty()).then(|| (prop, value.to_string()))
        })
        .collect()
}

fn serialize_style(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(p, v)| format!("{p}: {v};"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn edit_style<F>(tree: &mut Tree<Node>, id: NodeId, edit: F) -> bool
where
    F: FnOnce(&mut Vec<(String, String)>),
{
    rewrite_attrs(tree, id, |attrs| {
        let mut decls = attrs
            .iter()
            .find(|(k, _)| k == "style")
            .map(|(_, v)| parse_style(v))
            .unwrap_or_default();
        edit(&mut decls);

        attrs.retain(|(k, _)| k != "style");
        if !decls.is_empty() {
            attrs.push(("style".to_string(), serialize_style(&decls)));
        }
    })
}

/// Sets inline style properties, replacing existing values for the same property
pub fn set_style(tree: &mut Tree<Node>, id: NodeId, props: &[(&str, &str)]) -> bool {
    edit_style(tree, id, |decls| {
        for (prop, value) in props {
            match decls.iter_mut().find(|(p, _)| p == prop) {
                Some(slot) => slot.1 = value.to_string(),
                None => decls.push((prop.to_string(), value.to_string())),
            }
        }
    })
}

/// Removes inline style properties; an emptied style attribute is dropped
pub fn remove_style_properties(tree: &mut Tree<Node>, id: NodeId, props: &[&str]) -> bool {
    edit_style(tree, id, |decls| decls.retain(|(p, _)| !props.contains(&p.as_str())))
}

/// Reads a single inline style property
pub fn style_property(document: &Html, id: NodeId, prop: &str) -> Option<String> {
    get_attr(document, id, "style").and_then(|style| {
        parse_style(&style)
            .into_iter()
            .find(|(p, _)| p == prop)
            .map(|(_, v)| v)
    })
}
