//! Retained scene graph a view draws into.
//!
//! A [`Surface`] owns one root group. Views mutate it in place between frames
//! and the result can be serialized (see [`crate::svg`]) or walked by a terminal
//! renderer. Keyed reconciliation of children goes through [`join`].

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Rect,
    Text(String),
    Path,
}

impl NodeKind {
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Group => "g",
            NodeKind::Rect => "rect",
            NodeKind::Text(_) => "text",
            NodeKind::Path => "path",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub duration: Duration,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub key: Option<String>,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
    transition: Option<Transition>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self { kind, key: None, attrs: Vec::new(), children: Vec::new(), transition: None }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn rect() -> Self {
        Self::new(NodeKind::Rect)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(content.into()))
    }

    pub fn path() -> Self {
        Self::new(NodeKind::Path)
    }

    pub fn with_attr(mut self, name: &str, value: impl ToString) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", class)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn set_attr(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        self.attr(name)?.trim_end_matches("px").parse().ok()
    }

    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    /// Space-separated class list contains every class named in `class`,
    /// so `"x axis"` matches a node classed `"axis x"`.
    pub fn has_class(&self, class: &str) -> bool {
        let Some(own) = self.attr("class") else {
            return false;
        };
        let mut wanted = class.split_whitespace().peekable();
        wanted.peek().is_some()
            && wanted.all(|w| own.split_whitespace().any(|part| part == w))
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn append(&mut self, child: Node) -> &mut Node {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn replace_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    /// Direct children carrying `class`.
    pub fn select_all(&self, class: &str) -> impl Iterator<Item = &Node> + '_ {
        let class = class.to_string();
        self.children.iter().filter(move |c| c.has_class(&class))
    }

    pub fn select_mut(&mut self, class: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|c| c.has_class(class))
    }

    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    /// Replaces any transition in flight.
    pub fn start_transition(&mut self, duration: Duration, generation: u64) {
        self.transition = Some(Transition { duration, generation });
    }

    /// `(x, y)` from a `translate(x,y)` transform.
    pub fn translation(&self) -> Option<(f64, f64)> {
        let t = self.attr("transform")?;
        let inner = t.strip_prefix("translate(")?.strip_suffix(')')?;
        let (x, y) = inner.split_once(',')?;
        Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

/// Drawing area attached under a container.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub container: String,
    pub width: f64,
    pub height: f64,
    root: Node,
}

impl Surface {
    pub fn new(container: impl Into<String>, width: f64, height: f64) -> Self {
        Self { container: container.into(), width, height, root: Node::group() }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }
}

/// Outcome of matching keyed nodes against keyed data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinPlan {
    /// Data indices with no node.
    pub enter: Vec<usize>,
    /// `(node index, data index)` pairs.
    pub update: Vec<(usize, usize)>,
    /// Node indices with no datum.
    pub exit: Vec<usize>,
}

/// Matches nodes to data by key. Each node matches at most once and the first
/// node with a key wins; data whose key is already taken enters as new nodes.
pub fn join<K: Eq + Hash>(existing: &[K], incoming: &[K]) -> JoinPlan {
    let mut by_key: HashMap<&K, usize> = HashMap::new();
    let mut plan = JoinPlan::default();
    for (i, k) in existing.iter().enumerate() {
        if by_key.contains_key(k) {
            plan.exit.push(i);
        } else {
            by_key.insert(k, i);
        }
    }
    for (d, k) in incoming.iter().enumerate() {
        match by_key.remove(k) {
            Some(n) => plan.update.push((n, d)),
            None => plan.enter.push(d),
        }
    }
    plan.exit.extend(by_key.into_values());
    plan.exit.sort_unstable();
    plan
}
