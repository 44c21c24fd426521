//! Headless document
//!
//! An arena of elements rooted at a `body` node, with the two kinds of click
//! listeners a widget needs:
//!
//! - element listeners, one per node, run from the click target up to the
//!   body (bubble order). A listener returning [`Propagation::Stop`] ends the
//!   dispatch, window phase included.
//! - window listeners, run after the element phase for every click in the
//!   document. Registering one yields a [`ListenerGuard`]; dropping the guard
//!   unregisters it.
//!
//! The composed path of a click is computed before any listener runs, so
//! listeners that rebuild parts of the tree do not change who else hears the
//! click.

use crate::error::{DropdownError, DropdownResult};
use crate::render::{ClickHandler, VNode};
use slotmap::{new_key_type, Key, SlotMap};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

new_key_type! {
    /// Arena key of a node.
    ///
    /// Slots of removed nodes are reused, but a key is versioned: an id kept
    /// past its node's removal never resolves to the node that took the slot.
    pub struct NodeId;
}

impl NodeId {
    /// Raw key value, slot index and version packed together
    #[must_use]
    pub fn as_raw(self) -> u64 {
        self.data().as_ffi()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:?}", self.data())
    }
}

/// A live element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name
    pub tag: String,
    /// CSS classes
    pub classes: Vec<String>,
    /// Attributes
    pub attributes: BTreeMap<String, String>,
    /// Own text (children excluded)
    pub text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    /// Creates an element with no classes, attributes or text
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Sets an attribute
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Sets the own text
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    fn from_vnode(vnode: &VNode) -> Self {
        Self {
            tag: vnode.tag.clone(),
            classes: vnode.classes.clone(),
            attributes: vnode.attributes.clone(),
            text: vnode.text.clone(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Checks for a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Attribute value
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Parent node, `None` for the body
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in document order
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Whether a click continues to ancestors and window listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Keep dispatching
    Continue,
    /// Stop here
    Stop,
}

/// A click as seen by listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    /// Node that was clicked
    pub target: NodeId,
    path: Vec<NodeId>,
}

impl ClickEvent {
    /// Target first, body last
    #[must_use]
    pub fn composed_path(&self) -> &[NodeId] {
        &self.path
    }

    /// Whether the click happened on `node` or one of its descendants
    #[must_use]
    pub fn passes_through(&self, node: NodeId) -> bool {
        self.path.contains(&node)
    }
}

/// Summary of one dispatched click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Node that was clicked
    pub target: NodeId,
    /// Element listeners that ran
    pub element_listeners: usize,
    /// Window listeners that ran
    pub window_listeners: usize,
    /// Whether an element listener stopped propagation
    pub propagation_stopped: bool,
}

/// Listener attached to a single element
pub type ElementListener = Rc<dyn Fn(&mut Document, &ClickEvent) -> Propagation>;

/// Listener hearing every click in the document
pub type WindowListener = Rc<dyn Fn(&mut Document, &ClickEvent)>;

/// Identifies a registered window listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(ListenerId, WindowListener)>,
}

impl ListenerRegistry {
    fn add(&mut self, listener: WindowListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(current, _)| *current != id);
        self.listeners.len() != before
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|(current, _)| *current == id)
    }

    fn snapshot(&self) -> Vec<WindowListener> {
        self.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
    }
}

/// Keeps a window listener registered; dropping it unregisters the listener
pub struct ListenerGuard {
    registry: Weak<RefCell<ListenerRegistry>>,
    id: ListenerId,
}

impl ListenerGuard {
    /// Id of the guarded listener
    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener is still registered
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().contains(self.id))
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.try_borrow_mut() {
                let removed = registry.remove(self.id);
                debug!(listener = self.id.0, removed, "window listener released");
            }
        }
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

struct Node {
    element: Element,
    listener: Option<ElementListener>,
}

/// The headless document
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    body: NodeId,
    window: Rc<RefCell<ListenerRegistry>>,
    dispatched: usize,
    last_dispatch: Option<DispatchOutcome>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("live_nodes", &self.live_node_count())
            .field("window_listeners", &self.window_listener_count())
            .field("dispatched", &self.dispatched)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Creates a document holding only a body
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node {
            element: Element::new("body"),
            listener: None,
        });
        Self {
            nodes,
            body,
            window: Rc::new(RefCell::new(ListenerRegistry::default())),
            dispatched: 0,
            last_dispatch: None,
        }
    }

    /// The body node
    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    fn node(&self, id: NodeId) -> DropdownResult<&Node> {
        self.nodes
            .get(id)
            .ok_or(DropdownError::UnknownNode { id: id.as_raw() })
    }

    fn node_mut(&mut self, id: NodeId) -> DropdownResult<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or(DropdownError::UnknownNode { id: id.as_raw() })
    }

    /// Element for a live node
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).ok().map(|n| &n.element)
    }

    /// Mutable element for a live node
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_mut(id).ok().map(|n| &mut n.element)
    }

    /// Whether the id names a live node
    #[must_use]
    pub fn exists(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Parent of a live node
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).and_then(Element::parent)
    }

    /// Children of a live node, empty for unknown ids
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.element(id) {
            Some(element) => element.children(),
            None => &[],
        }
    }

    /// Whether the node is connected to the body
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(self.body, id)
    }

    /// Whether `node` is `ancestor` or one of its descendants
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = self.exists(node).then_some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Descendants of `id` in document order, `id` excluded
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Own text followed by descendant text
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.element(id).and_then(|e| e.text.as_deref()) {
            out.push_str(text);
        }
        for &child in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// Attached nodes carrying `class`, in document order
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(|e| e.has_class(class)))
            .collect()
    }

    /// Number of live nodes, body included
    #[must_use]
    pub fn live_node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes the arena holds before it has to grow
    #[must_use]
    pub fn arena_capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Appends an element under `parent`
    pub fn append_child(&mut self, parent: NodeId, element: Element) -> DropdownResult<NodeId> {
        self.node(parent)?;
        let mut element = element;
        element.parent = Some(parent);
        element.children.clear();
        let id = self.nodes.insert(Node {
            element,
            listener: None,
        });
        self.node_mut(parent)?.element.children.push(id);
        Ok(id)
    }

    /// Attaches (or clears) the click listener of a node
    pub fn set_listener(
        &mut self,
        id: NodeId,
        listener: Option<ElementListener>,
    ) -> DropdownResult<()> {
        self.node_mut(id)?.listener = listener;
        Ok(())
    }

    /// Writes a virtual tree under `parent`, binding click handlers with `bind`
    pub fn append_vnode(
        &mut self,
        parent: NodeId,
        vnode: &VNode,
        bind: &dyn Fn(&ClickHandler) -> ElementListener,
    ) -> DropdownResult<NodeId> {
        let id = self.append_child(parent, Element::from_vnode(vnode))?;
        if let Some(handler) = &vnode.on_click {
            self.set_listener(id, Some(bind(handler)))?;
        }
        for child in &vnode.children {
            self.append_vnode(id, child, bind)?;
        }
        Ok(id)
    }

    /// Replaces node `id` and its subtree with `vnode`, keeping the id and
    /// its position under the parent
    pub fn patch(
        &mut self,
        id: NodeId,
        vnode: &VNode,
        bind: &dyn Fn(&ClickHandler) -> ElementListener,
    ) -> DropdownResult<()> {
        let old_children = self.node(id)?.element.children.clone();
        for child in old_children {
            self.free(child);
        }

        let listener = vnode.on_click.as_ref().map(bind);
        let node = self.node_mut(id)?;
        let parent = node.element.parent;
        node.element = Element::from_vnode(vnode);
        node.element.parent = parent;
        node.listener = listener;

        for child in &vnode.children {
            self.append_vnode(id, child, bind)?;
        }
        Ok(())
    }

    /// Detaches and drops a node and its descendants. The body cannot be removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> DropdownResult<()> {
        if id == self.body {
            return Err(DropdownError::UnknownNode { id: id.as_raw() });
        }
        let parent = self.node(id)?.element.parent;
        if let Some(parent) = parent {
            if let Ok(parent) = self.node_mut(parent) {
                parent.element.children.retain(|c| *c != id);
            }
        }
        self.free(id);
        Ok(())
    }

    fn free(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        for child in node.element.children {
            self.free(child);
        }
    }

    fn path_to_root(&self, target: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.parent(current);
        }
        path
    }

    /// Dispatches a click on `target`
    pub fn click(&mut self, target: NodeId) -> DropdownResult<DispatchOutcome> {
        self.node(target)?;
        let event = ClickEvent {
            target,
            path: self.path_to_root(target),
        };

        let listeners: Vec<ElementListener> = event
            .path
            .iter()
            .filter_map(|id| self.node(*id).ok().and_then(|n| n.listener.clone()))
            .collect();

        let mut outcome = DispatchOutcome {
            target,
            element_listeners: 0,
            window_listeners: 0,
            propagation_stopped: false,
        };

        for listener in listeners {
            outcome.element_listeners += 1;
            if listener(&mut *self, &event) == Propagation::Stop {
                outcome.propagation_stopped = true;
                break;
            }
        }

        if !outcome.propagation_stopped {
            let window = self.window.borrow().snapshot();
            for listener in window {
                outcome.window_listeners += 1;
                listener(&mut *self, &event);
            }
        }

        debug!(
            target = %target,
            element_listeners = outcome.element_listeners,
            window_listeners = outcome.window_listeners,
            stopped = outcome.propagation_stopped,
            "click dispatched"
        );
        self.dispatched += 1;
        self.last_dispatch = Some(outcome.clone());
        Ok(outcome)
    }

    /// Registers a listener for every click in the document
    #[must_use = "dropping the guard unregisters the listener"]
    pub fn add_window_listener<F>(&mut self, listener: F) -> ListenerGuard
    where
        F: Fn(&mut Document, &ClickEvent) + 'static,
    {
        let id = self.window.borrow_mut().add(Rc::new(listener));
        debug!(listener = id.0, "window listener registered");
        ListenerGuard {
            registry: Rc::downgrade(&self.window),
            id,
        }
    }

    /// Number of registered window listeners
    #[must_use]
    pub fn window_listener_count(&self) -> usize {
        self.window.borrow().listeners.len()
    }

    /// Number of clicks dispatched so far
    #[must_use]
    pub const fn dispatch_count(&self) -> usize {
        self.dispatched
    }

    /// Outcome of the most recent click
    #[must_use]
    pub const fn last_dispatch(&self) -> Option<&DispatchOutcome> {
        self.last_dispatch.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DropdownEvent;
    use std::cell::Cell;

    fn tree(doc: &mut Document) -> (NodeId, NodeId, NodeId) {
        let outer = doc
            .append_child(doc.body(), Element::new("div").with_class("outer"))
            .unwrap();
        let inner = doc
            .append_child(outer, Element::new("span").with_text("hello"))
            .unwrap();
        let sibling = doc
            .append_child(doc.body(), Element::new("button").with_text("elsewhere"))
            .unwrap();
        (outer, inner, sibling)
    }

    // ===== structure =====

    #[test]
    fn test_new_document_has_body() {
        let doc = Document::new();
        assert_eq!(doc.element(doc.body()).unwrap().tag, "body");
        assert_eq!(doc.live_node_count(), 1);
    }

    #[test]
    fn test_append_and_query() {
        let mut doc = Document::new();
        let (outer, inner, _) = tree(&mut doc);
        assert_eq!(doc.parent(inner), Some(outer));
        assert_eq!(doc.children(outer), &[inner]);
        assert!(doc.contains(outer, inner));
        assert!(!doc.contains(inner, outer));
        assert!(doc.is_attached(inner));
        assert_eq!(doc.text_content(doc.body()), "helloelsewhere");
        assert_eq!(doc.find_by_class("outer"), vec![outer]);
    }

    #[test]
    fn test_append_to_unknown_parent_fails() {
        let mut doc = Document::new();
        let result = doc.append_child(NodeId::default(), Element::new("div"));
        assert!(matches!(result, Err(DropdownError::UnknownNode { .. })));
    }

    #[test]
    fn test_remove_subtree_frees_descendants() {
        let mut doc = Document::new();
        let (outer, inner, _) = tree(&mut doc);
        doc.remove_subtree(outer).unwrap();
        assert!(!doc.exists(outer));
        assert!(!doc.exists(inner));
        assert_eq!(doc.children(doc.body()).len(), 1);
        assert!(doc.remove_subtree(doc.body()).is_err());
    }

    #[test]
    fn test_removed_slot_is_reused_without_reviving_the_old_id() {
        let mut doc = Document::new();
        let (outer, _, _) = tree(&mut doc);
        doc.remove_subtree(outer).unwrap();
        let capacity = doc.arena_capacity();

        let fresh = doc
            .append_child(doc.body(), Element::new("div").with_class("fresh"))
            .unwrap();
        assert_ne!(fresh, outer);
        assert!(!doc.exists(outer));
        assert!(doc.click(outer).is_err());
        assert_eq!(doc.arena_capacity(), capacity);
    }

    #[test]
    fn test_patch_keeps_id_and_position() {
        let mut doc = Document::new();
        let (outer, inner, sibling) = tree(&mut doc);
        let vnode = VNode::new("section")
            .with_class("patched")
            .with_child(VNode::new("p").with_text("new"));
        let bind = |_: &ClickHandler| -> ElementListener { Rc::new(|_: &mut Document, _: &ClickEvent| Propagation::Continue) };
        doc.patch(outer, &vnode, &bind).unwrap();

        assert!(!doc.exists(inner));
        assert_eq!(doc.children(doc.body()), &[outer, sibling]);
        assert_eq!(doc.element(outer).unwrap().tag, "section");
        assert_eq!(doc.text_content(outer), "new");
    }

    // ===== dispatch =====

    #[test]
    fn test_click_bubbles_target_to_root() {
        let mut doc = Document::new();
        let (outer, inner, _) = tree(&mut doc);
        let order = Rc::new(RefCell::new(Vec::new()));

        for (node, name) in [(outer, "outer"), (inner, "inner")] {
            let order = Rc::clone(&order);
            doc.set_listener(
                node,
                Some(Rc::new(move |_: &mut Document, _: &ClickEvent| {
                    order.borrow_mut().push(name);
                    Propagation::Continue
                })),
            )
            .unwrap();
        }

        let outcome = doc.click(inner).unwrap();
        assert_eq!(*order.borrow(), vec!["inner", "outer"]);
        assert_eq!(outcome.element_listeners, 2);
        assert!(!outcome.propagation_stopped);
    }

    #[test]
    fn test_stop_propagation_skips_ancestors_and_window() {
        let mut doc = Document::new();
        let (outer, inner, _) = tree(&mut doc);
        let outer_hits = Rc::new(Cell::new(0));
        let window_hits = Rc::new(Cell::new(0));

        doc.set_listener(inner, Some(Rc::new(|_: &mut Document, _: &ClickEvent| Propagation::Stop)))
            .unwrap();
        let hits = Rc::clone(&outer_hits);
        doc.set_listener(
            outer,
            Some(Rc::new(move |_: &mut Document, _: &ClickEvent| {
                hits.set(hits.get() + 1);
                Propagation::Continue
            })),
        )
        .unwrap();
        let hits = Rc::clone(&window_hits);
        let _guard = doc.add_window_listener(move |_, _| hits.set(hits.get() + 1));

        let outcome = doc.click(inner).unwrap();
        assert!(outcome.propagation_stopped);
        assert_eq!(outer_hits.get(), 0);
        assert_eq!(window_hits.get(), 0);
    }

    #[test]
    fn test_window_listener_sees_composed_path() {
        let mut doc = Document::new();
        let (outer, inner, sibling) = tree(&mut doc);
        let inside = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&inside);
        let _guard = doc.add_window_listener(move |_, event| {
            seen.borrow_mut().push(event.passes_through(outer));
        });

        doc.click(inner).unwrap();
        doc.click(sibling).unwrap();
        assert_eq!(*inside.borrow(), vec![true, false]);
        assert_eq!(doc.dispatch_count(), 2);
        assert_eq!(doc.last_dispatch().unwrap().window_listeners, 1);
    }

    #[test]
    fn test_click_unknown_node_fails() {
        let mut doc = Document::new();
        assert!(doc.click(NodeId::default()).is_err());
    }

    // ===== listener guard =====

    #[test]
    fn test_guard_drop_unregisters() {
        let mut doc = Document::new();
        let guard = doc.add_window_listener(|_, _| {});
        assert_eq!(doc.window_listener_count(), 1);
        assert!(guard.is_active());
        drop(guard);
        assert_eq!(doc.window_listener_count(), 0);
    }

    #[test]
    fn test_guard_outliving_document_is_harmless() {
        let mut doc = Document::new();
        let guard = doc.add_window_listener(|_, _| {});
        drop(doc);
        assert!(!guard.is_active());
        drop(guard);
    }

    #[test]
    fn test_listener_may_mutate_document() {
        let mut doc = Document::new();
        let (_, inner, _) = tree(&mut doc);
        let _guard = doc.add_window_listener(|doc, _| {
            let body = doc.body();
            let _ = doc.append_child(body, Element::new("div").with_class("added"));
        });
        doc.click(inner).unwrap();
        assert_eq!(doc.find_by_class("added").len(), 1);
    }

    #[test]
    fn test_append_vnode_binds_handlers() {
        let mut doc = Document::new();
        let vnode = VNode::new("div").with_child(
            VNode::new("span").on_click(ClickHandler::consuming(DropdownEvent::TogglePanel)),
        );
        let bound = Rc::new(Cell::new(0));
        let counter = Rc::clone(&bound);
        let bind = move |handler: &ClickHandler| -> ElementListener {
            counter.set(counter.get() + 1);
            let stop = handler.stop_propagation;
            Rc::new(move |_: &mut Document, _: &ClickEvent| {
                if stop {
                    Propagation::Stop
                } else {
                    Propagation::Continue
                }
            })
        };
        let root = doc.append_vnode(doc.body(), &vnode, &bind).unwrap();
        assert_eq!(bound.get(), 1);
        let span = doc.children(root)[0];
        assert!(doc.click(span).unwrap().propagation_stopped);
    }
}
