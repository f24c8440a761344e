//! Node types: NodeId, NodeData and the enums describing a node's role.

use std::collections::HashMap;

use slotmap::new_key_type;

use crate::geometry::Rect;
use crate::layout::spacing::SpacingRole;
use crate::sound::Sound;

new_key_type! {
    /// Generational handle to a node. Copy, lightweight (u64).
    ///
    /// A handle to a destroyed node never resolves again, even if its slot
    /// is reused.
    pub struct NodeId;
}

/// Whether a node is drawn and whether it takes part in focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Visible,
    /// Not drawn but still occupies layout space.
    Invisible,
    /// Not drawn and takes no layout space.
    Gone,
}

/// Main axis of a container.
///
/// A row resolves LEFT/RIGHT navigation locally, a column resolves UP/DOWN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    #[default]
    Row,
    Column,
}

/// A cardinal navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Whether a container laid out along `axis` resolves this direction.
    pub fn is_along(self, axis: Axis) -> bool {
        match axis {
            Axis::Row => matches!(self, Direction::Left | Direction::Right),
            Axis::Column => matches!(self, Direction::Up | Direction::Down),
        }
    }

    /// Scan offset among siblings: `+1` for RIGHT/DOWN, `-1` for LEFT/UP.
    pub fn step(self) -> isize {
        match self {
            Direction::Right | Direction::Down => 1,
            Direction::Left | Direction::Up => -1,
        }
    }
}

/// Structural kind of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A node without children.
    Leaf,
    /// A node owning an ordered list of children.
    Container {
        axis: Axis,
        /// Child tried first by default-focus resolution. Out-of-range or
        /// unset falls back to scanning from index 0.
        default_focus_index: Option<usize>,
    },
}

/// Target of a custom navigation route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A direct handle; may dangle if the target was destroyed.
    Node(NodeId),
    /// A node id string, resolved at navigation time from the nearest scope.
    Id(String),
}

/// Size hints consumed by the layout bridge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutHints {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub grow: f32,
}

/// Data associated with a single node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Type name used in log output (e.g. "Button", "Box").
    pub widget_type: String,
    /// Optional string id, target of id-based custom routes.
    pub id: Option<String>,
    pub kind: NodeKind,
    /// Whether this node can receive focus (when visible).
    pub focusable: bool,
    pub visibility: Visibility,
    /// Current resolved geometry, written by the layout pass.
    pub frame: Rect,
    /// Per-direction overrides of structural navigation.
    pub custom_routes: HashMap<Direction, Route>,
    /// Sound queued when navigation lands on this node.
    pub focus_sound: Sound,
    /// Spacing capability consulted by the layout bridge.
    pub spacing_role: SpacingRole,
    pub layout: LayoutHints,
    /// Whether this node currently holds focus.
    pub focused: bool,
    /// Direction of the running "no target" shake, if any.
    pub highlight_shake: Option<Direction>,
}

impl NodeData {
    /// Create a leaf node with the given type name and sensible defaults.
    pub fn new(widget_type: impl Into<String>) -> Self {
        Self {
            widget_type: widget_type.into(),
            id: None,
            kind: NodeKind::Leaf,
            focusable: false,
            visibility: Visibility::Visible,
            frame: Rect::EMPTY,
            custom_routes: HashMap::new(),
            focus_sound: Sound::FocusChange,
            spacing_role: SpacingRole::Plain,
            layout: LayoutHints::default(),
            focused: false,
            highlight_shake: None,
        }
    }

    /// Create a container node laid out along `axis`.
    pub fn container(widget_type: impl Into<String>, axis: Axis) -> Self {
        Self {
            kind: NodeKind::Container { axis, default_focus_index: None },
            ..Self::new(widget_type)
        }
    }

    /// Set the string id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set whether this node can receive focus (builder).
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Set the visibility (builder).
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the frame (builder).
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    /// Set the focus sound (builder).
    pub fn with_focus_sound(mut self, sound: Sound) -> Self {
        self.focus_sound = sound;
        self
    }

    /// Set the spacing role (builder).
    pub fn with_spacing_role(mut self, role: SpacingRole) -> Self {
        self.spacing_role = role;
        self
    }

    /// Set the layout hints (builder).
    pub fn with_layout(mut self, layout: LayoutHints) -> Self {
        self.layout = layout;
        self
    }

    /// Set the preferred default-focus child of a container (builder).
    ///
    /// No-op on leaves.
    pub fn with_default_focus_index(mut self, index: usize) -> Self {
        if let NodeKind::Container { default_focus_index, .. } = &mut self.kind {
            *default_focus_index = Some(index);
        }
        self
    }

    /// Whether this node is a container.
    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Container { .. })
    }

    /// The container axis, or `None` for leaves.
    pub fn axis(&self) -> Option<Axis> {
        match self.kind {
            NodeKind::Container { axis, .. } => Some(axis),
            NodeKind::Leaf => None,
        }
    }

    /// Whether this node is a focus candidate: focusable *and* visible.
    pub fn is_focus_candidate(&self) -> bool {
        self.focusable && self.visibility == Visibility::Visible
    }

    /// Short description for log output.
    pub fn describe(&self) -> String {
        match &self.id {
            Some(id) => format!("{} (id=\"{}\")", self.widget_type, id),
            None => self.widget_type.clone(),
        }
    }
}
