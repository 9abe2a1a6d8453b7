use serde::{Deserialize, Serialize};

/// Stable per-node id issued by the owning graph; survives save and load.
pub type NodeId = u32;

/// Generation-checked reference to a node slot.
///
/// A handle stops resolving once its node is removed, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// A pin addressed by its owning node and its position in that node's pin list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinRef {
    pub node: NodeHandle,
    pub pin: usize,
}

impl PinRef {
    pub fn new(node: NodeHandle, pin: usize) -> Self {
        Self { node, pin }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PinCategory {
    Exec,
    Int,
    Float,
    Bool,
    Pose,
}

impl PinCategory {
    /// Textual default a freshly allocated data pin of this category carries.
    pub fn default_text(&self) -> &'static str {
        match self {
            PinCategory::Int => "0",
            PinCategory::Float => "0.0",
            PinCategory::Bool => "false",
            PinCategory::Exec | PinCategory::Pose => "",
        }
    }

    pub fn is_exec(&self) -> bool {
        matches!(self, PinCategory::Exec)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub name: String,
    pub direction: PinDirection,
    pub category: PinCategory,
    /// Used only while the pin is unlinked.
    pub default_value: String,
    pub(crate) links: Vec<PinRef>,
}

impl Pin {
    pub fn input(name: &str, category: PinCategory, default_value: &str) -> Self {
        Self {
            name: name.to_string(),
            direction: PinDirection::Input,
            category,
            default_value: default_value.to_string(),
            links: Vec::new(),
        }
    }

    pub fn output(name: &str, category: PinCategory) -> Self {
        Self {
            name: name.to_string(),
            direction: PinDirection::Output,
            category,
            default_value: String::new(),
            links: Vec::new(),
        }
    }

    /// Partner pins in link order.
    pub fn links(&self) -> &[PinRef] {
        &self.links
    }

    pub fn is_linked(&self) -> bool {
        !self.links.is_empty()
    }

    /// The first partner; for data inputs this is the only one.
    pub fn first_link(&self) -> Option<PinRef> {
        self.links.first().copied()
    }
}
