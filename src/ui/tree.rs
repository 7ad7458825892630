//! Declarative render tree and its event-binding table.
//!
//! Renderers produce a [`Page`]: a list of [`Node`]s describing what to show plus a
//! table mapping every interactive [`Control`] to the [`Command`] it triggers. The tree
//! itself holds no handlers. The host paints the nodes and reports activations by
//! [`ControlId`]; the controller looks the command up in the table of the page it painted.
//!
//! # Architecture
//!
//! ```text
//! View ──render──▶ PageBuilder ──finish──▶ Page { nodes, bindings }
//!                                   │
//!                                   └─patch──▶ RegionPatch (one subtree + its bindings)
//! ```
//!
//! A control built without a command is painted disabled and never enters the table,
//! so a disabled pagination button cannot be activated even by a forged event.

use crate::app::actions::Command;
use crate::domain::Tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of an interactive control within one painted page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControlId(pub u32);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// The two cosmetic accent groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accent {
    /// Cyan/blue group, used by most categories.
    Cyan,
    /// Purple/pink group.
    Purple,
}

impl Accent {
    /// Accent of a tool category: `codeagent` and `ai-test` are purple, everything else cyan.
    ///
    /// ```
    /// use codenexus::ui::Accent;
    ///
    /// assert_eq!(Accent::for_category(Some("ai-test")), Accent::Purple);
    /// assert_eq!(Accent::for_category(None), Accent::Cyan);
    /// ```
    #[must_use]
    pub fn for_category(category: Option<&str>) -> Self {
        match category {
            Some("codeagent" | "ai-test") => Self::Purple,
            _ => Self::Cyan,
        }
    }
}

/// Presentation tone of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Normal,
    Muted,
    Error,
    Success,
    Pending,
    Highlight,
}

/// A button or link the user can activate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub id: ControlId,
    pub label: String,
    pub enabled: bool,
}

/// One item of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    /// Character ranges of `title` matched by the active search.
    pub title_highlights: Vec<(usize, usize)>,
    pub accent: Option<Accent>,
    /// Small label shown before the title (icon, kind, feed).
    pub badge: Option<String>,
    /// Secondary lines such as source and date.
    pub meta: Vec<String>,
    pub body: Option<String>,
    pub tags: Vec<Tag>,
    pub controls: Vec<Control>,
}

/// `上一页 / 第 p / N 页 / 下一页` bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationBar {
    pub previous: Control,
    pub label: String,
    pub next: Control,
}

/// Forms the host can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormId {
    RecentSearch,
    Article,
    Tool,
}

impl FormId {
    /// Short name used by the terminal host.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RecentSearch => "search",
            Self::Article => "article",
            Self::Tool => "tool",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "search" => Some(Self::RecentSearch),
            "article" => Some(Self::Article),
            "tool" => Some(Self::Tool),
            _ => None,
        }
    }
}

/// One input of a form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub required: bool,
    /// Current value; placeholder text when empty is the host's concern.
    pub value: String,
    /// `(value, label)` pairs for a choice field; empty for free text.
    pub choices: Vec<(String, String)>,
}

/// A submittable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub fields: Vec<Field>,
    pub submit_label: String,
    pub status: Option<(String, Tone)>,
}

/// Subtrees that can be replaced without repainting the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    RelatedArticles,
}

/// A render-tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Heading { text: String, subtitle: Option<String> },
    Section { title: String, children: Vec<Node> },
    Text { text: String, tone: Tone },
    Spinner,
    /// Empty-result placeholder.
    Placeholder(String),
    InlineError(String),
    Card(Card),
    Controls(Vec<Control>),
    Pagination(PaginationBar),
    /// Rich-text body painted as-is.
    RichText(String),
    Form(Form),
    Region { region: Region, children: Vec<Node> },
}

impl Node {
    /// Shorthand for a normal-tone text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into(), tone: Tone::Normal }
    }

    fn visit<'a>(&'a self, out: &mut Vec<&'a Self>) {
        out.push(self);
        match self {
            Self::Section { children, .. } | Self::Region { children, .. } => {
                for child in children {
                    child.visit(out);
                }
            }
            _ => {}
        }
    }

    fn controls(&self) -> Vec<&Control> {
        match self {
            Self::Card(card) => card.controls.iter().collect(),
            Self::Controls(controls) => controls.iter().collect(),
            Self::Pagination(bar) => vec![&bar.previous, &bar.next],
            _ => vec![],
        }
    }

    fn controls_mut(&mut self) -> Vec<&mut Control> {
        match self {
            Self::Card(card) => card.controls.iter_mut().collect(),
            Self::Controls(controls) => controls.iter_mut().collect(),
            Self::Pagination(bar) => vec![&mut bar.previous, &mut bar.next],
            Self::Section { children, .. } | Self::Region { children, .. } => {
                children.iter_mut().flat_map(Self::controls_mut).collect()
            }
            _ => vec![],
        }
    }

    fn texts(&self) -> Vec<&str> {
        match self {
            Self::Heading { text, subtitle } => {
                std::iter::once(text.as_str()).chain(subtitle.as_deref()).collect()
            }
            Self::Section { title, .. } => vec![title.as_str()],
            Self::Text { text, .. } | Self::Placeholder(text) | Self::InlineError(text) | Self::RichText(text) => {
                vec![text.as_str()]
            }
            Self::Card(card) => std::iter::once(card.title.as_str())
                .chain(card.badge.as_deref())
                .chain(card.meta.iter().map(String::as_str))
                .chain(card.body.as_deref())
                .chain(card.tags.iter().map(|t| t.label.as_str()))
                .collect(),
            Self::Pagination(bar) => vec![bar.label.as_str()],
            Self::Form(form) => std::iter::once(form.submit_label.as_str())
                .chain(form.fields.iter().map(|f| f.label.as_str()))
                .chain(form.status.as_ref().map(|(s, _)| s.as_str()))
                .collect(),
            Self::Spinner | Self::Controls(_) | Self::Region { .. } => vec![],
        }
    }
}

/// A painted surface: nodes plus the command bound to each enabled control.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    pub nodes: Vec<Node>,
    pub bindings: BTreeMap<ControlId, Command>,
    /// First id not used by this page; region patches continue from here.
    pub next_id: u32,
}

impl Page {
    /// Command bound to a control, if it is enabled on this page.
    #[must_use]
    pub fn command(&self, id: ControlId) -> Option<&Command> {
        self.bindings.get(&id)
    }

    fn flatten(&self) -> Vec<&Node> {
        let mut out = vec![];
        for node in &self.nodes {
            node.visit(&mut out);
        }
        out
    }

    /// Every control on the page in paint order, enabled or not.
    #[must_use]
    pub fn controls(&self) -> Vec<&Control> {
        self.flatten().into_iter().flat_map(Node::controls).collect()
    }

    /// First control with the given label.
    #[must_use]
    pub fn control_by_label(&self, label: &str) -> Option<&Control> {
        self.controls().into_iter().find(|c| c.label == label)
    }

    /// Every visible text of the page, control labels excluded.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.flatten().into_iter().flat_map(Node::texts).collect()
    }

    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
            || self.controls().iter().any(|c| c.label.contains(needle))
    }

    /// Changes the label of one control. Returns whether the control exists.
    pub fn relabel(&mut self, id: ControlId, label: &str) -> bool {
        let target = self
            .nodes
            .iter_mut()
            .flat_map(Node::controls_mut)
            .find(|c| c.id == id);

        match target {
            Some(control) => {
                control.label = label.to_string();
                true
            }
            None => false,
        }
    }

    /// Replaces the children of a region together with their bindings.
    ///
    /// Returns `false`, leaving the page untouched, when the region is not on the page.
    pub fn apply_patch(&mut self, patch: &RegionPatch) -> bool {
        let Some(children) = find_region(&mut self.nodes, patch.region) else {
            return false;
        };

        let stale: Vec<ControlId> = children.iter_mut().flat_map(Node::controls_mut).map(|c| c.id).collect();
        *children = patch.nodes.clone();

        for id in stale {
            self.bindings.remove(&id);
        }
        self.bindings.extend(patch.bindings.iter().map(|(id, cmd)| (*id, cmd.clone())));
        self.next_id = self.next_id.max(patch.next_id);
        true
    }
}

fn find_region(nodes: &mut [Node], region: Region) -> Option<&mut Vec<Node>> {
    for node in nodes {
        let is_target = matches!(node, Node::Region { region: r, .. } if *r == region);
        if let Node::Section { children, .. } | Node::Region { children, .. } = node {
            if is_target {
                return Some(children);
            }
            if let Some(found) = find_region(children, region) {
                return Some(found);
            }
        }
    }
    None
}

/// Replacement of one region, produced by a partial refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPatch {
    pub region: Region,
    pub nodes: Vec<Node>,
    pub bindings: BTreeMap<ControlId, Command>,
    pub next_id: u32,
}

/// Allocates control ids and collects bindings while a renderer builds nodes.
#[derive(Debug, Default)]
pub struct PageBuilder {
    bindings: BTreeMap<ControlId, Command>,
    next_id: u32,
}

impl PageBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self { bindings: BTreeMap::new(), next_id: 1 }
    }

    /// Continues numbering after an already painted page, for region patches.
    #[must_use]
    pub fn continuing(page: &Page) -> Self {
        Self { bindings: BTreeMap::new(), next_id: page.next_id.max(1) }
    }

    /// Creates a control. Without a command it is disabled and left unbound.
    pub fn control(&mut self, label: impl Into<String>, command: Option<Command>) -> Control {
        let id = ControlId(self.next_id);
        self.next_id += 1;

        let enabled = command.is_some();
        if let Some(command) = command {
            self.bindings.insert(id, command);
        }

        Control { id, label: label.into(), enabled }
    }

    #[must_use]
    pub fn finish(self, nodes: Vec<Node>) -> Page {
        Page { nodes, bindings: self.bindings, next_id: self.next_id }
    }

    #[must_use]
    pub fn patch(self, region: Region, nodes: Vec<Node>) -> RegionPatch {
        RegionPatch { region, nodes, bindings: self.bindings, next_id: self.next_id }
    }
}
