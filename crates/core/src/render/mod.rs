//! Render seam between the animation engine and whatever draws it.
//!
//! The engine hands a [`Frame`] to a [`RenderTarget`] after every state
//! mutation. Targets that want geometry call [`Frame::draw_commands`], which
//! lays the snapshot out as bars or as a tree scaled to the canvas.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Element, ElementState, Node, NodeState, MAX_VALUE};
use crate::{Result, VisualiserError};

/// Drawing surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        let valid = |side: f32| side.is_finite() && side > 0.0;
        if !valid(width) || !valid(height) {
            return Err(VisualiserError::InvalidCanvas { width, height });
        }
        Ok(Self { width, height })
    }
}

/// Read-only view of the dataset being animated.
#[derive(Debug, Clone, Copy)]
pub enum Snapshot<'a> {
    Bars(&'a [Element]),
    Tree(&'a Node),
}

impl<'a> Snapshot<'a> {
    pub fn to_dataset(&self) -> Dataset {
        match self {
            Snapshot::Bars(elements) => Dataset::Array(elements.to_vec()),
            Snapshot::Tree(root) => Dataset::Tree((*root).clone()),
        }
    }
}

impl<'a> From<&'a Dataset> for Snapshot<'a> {
    fn from(dataset: &'a Dataset) -> Self {
        match dataset {
            Dataset::Array(elements) => Snapshot::Bars(elements),
            Dataset::Tree(root) => Snapshot::Tree(root),
        }
    }
}

/// Everything a render target receives for one redraw. Step 0 is the
/// synchronous render performed by `initialize`.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub snapshot: Snapshot<'a>,
    pub canvas: Canvas,
    pub step: u64,
}

impl Frame<'_> {
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        self.draw_commands_with(&Palette::default())
    }

    /// Lays out the snapshot. The first command is always [`DrawCommand::Clear`].
    pub fn draw_commands_with(&self, palette: &Palette) -> Vec<DrawCommand> {
        let mut commands = vec![DrawCommand::Clear];
        match self.snapshot {
            Snapshot::Bars(elements) => layout_bars(elements, self.canvas, palette, &mut commands),
            Snapshot::Tree(root) => layout_tree(root, self.canvas, palette, &mut commands),
        }
        commands
    }
}

/// Presentation-layer hook invoked after each state mutation.
pub trait RenderTarget {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()>;
}

impl<T: RenderTarget + ?Sized> RenderTarget for Box<T> {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        (**self).present(frame)
    }
}

/// Fans each frame out to both targets, left first.
impl<A: RenderTarget, B: RenderTarget> RenderTarget for (A, B) {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.0.present(frame)?;
        self.1.present(frame)
    }
}

/// 24-bit RGB colour, serialised as `#RRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color(u32);

impl Color {
    pub const fn rgb(hex: u32) -> Self {
        Self(hex & 0x00FF_FFFF)
    }

    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::rgb)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({self})")
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = VisualiserError;

    fn try_from(value: String) -> Result<Self> {
        Color::from_hex(&value).ok_or_else(|| VisualiserError::msg(format!("invalid colour `{value}`")))
    }
}

/// Fill colours per state tag plus the chrome around them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub bar_default: Color,
    pub bar_comparing: Color,
    pub bar_swapping: Color,
    pub bar_pivot: Color,
    pub bar_sorted: Color,
    pub node_default: Color,
    pub node_current: Color,
    pub node_processing: Color,
    pub node_visited: Color,
    pub node_stroke: Color,
    pub edge: Color,
    pub grid: Color,
    pub axis_label: Color,
    pub bar_label: Color,
    pub node_label: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bar_default: Color::rgb(0x2196F3),
            bar_comparing: Color::rgb(0xFF69B4),
            bar_swapping: Color::rgb(0xFF4081),
            bar_pivot: Color::rgb(0xFFA500),
            bar_sorted: Color::rgb(0x4CAF50),
            node_default: Color::rgb(0x2196F3),
            node_current: Color::rgb(0xFF4081),
            node_processing: Color::rgb(0xFFA726),
            node_visited: Color::rgb(0x4CAF50),
            node_stroke: Color::rgb(0xFFFFFF),
            edge: Color::rgb(0x666666),
            grid: Color::rgb(0xE0E0E0),
            axis_label: Color::rgb(0x666666),
            bar_label: Color::rgb(0x333333),
            node_label: Color::rgb(0xFFFFFF),
        }
    }
}

impl Palette {
    pub fn element(&self, state: ElementState) -> Color {
        match state {
            ElementState::Default => self.bar_default,
            ElementState::Comparing => self.bar_comparing,
            ElementState::Swapping => self.bar_swapping,
            ElementState::Pivot => self.bar_pivot,
            ElementState::Sorted => self.bar_sorted,
        }
    }

    pub fn node(&self, state: NodeState) -> Color {
        match state {
            NodeState::Default => self.node_default,
            NodeState::Current => self.node_current,
            NodeState::Processing => self.node_processing,
            NodeState::Visited => self.node_visited,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Drawing primitive in canvas pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Discard everything drawn by the previous frame.
    Clear,
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        corner_radius: f32,
        fill: Color,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        fill: Color,
        stroke: Color,
        stroke_width: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: Color,
        stroke_width: f32,
        dashed: bool,
    },
    Text {
        x: f32,
        y: f32,
        content: String,
        size: f32,
        fill: Color,
        anchor: TextAnchor,
    },
}

const BAR_MARGIN_LEFT: f32 = 40.0;
const BAR_MARGIN_RIGHT: f32 = 40.0;
const BAR_MARGIN_TOP: f32 = 60.0;
const BAR_MARGIN_BOTTOM: f32 = 40.0;
const BAR_MAX_WIDTH: f32 = 1400.0;
const GRID_STEP: u32 = 20;

fn layout_bars(elements: &[Element], canvas: Canvas, palette: &Palette, out: &mut Vec<DrawCommand>) {
    let usable_width =
        ((canvas.width * 0.95).min(BAR_MAX_WIDTH) - BAR_MARGIN_LEFT - BAR_MARGIN_RIGHT).max(0.0);
    let usable_height = (canvas.height - BAR_MARGIN_TOP - BAR_MARGIN_BOTTOM).max(0.0);
    let scale_y = |value: u32| usable_height - value as f32 / MAX_VALUE as f32 * usable_height;

    for tick in (0..=MAX_VALUE).step_by(GRID_STEP as usize) {
        let y = BAR_MARGIN_TOP + scale_y(tick);
        out.push(DrawCommand::Line {
            x1: BAR_MARGIN_LEFT,
            y1: y,
            x2: BAR_MARGIN_LEFT + usable_width,
            y2: y,
            stroke: palette.grid,
            stroke_width: 1.0,
            dashed: true,
        });
        out.push(DrawCommand::Text {
            x: BAR_MARGIN_LEFT - 10.0,
            y,
            content: tick.to_string(),
            size: 12.0,
            fill: palette.axis_label,
            anchor: TextAnchor::End,
        });
    }

    if elements.is_empty() {
        return;
    }

    let slot = usable_width / elements.len() as f32;
    let spacing = (usable_width * 0.02).max(4.0);
    let bar_width = (slot - spacing).max(2.0);
    let label_size = (bar_width / 2.5).clamp(10.0, 14.0);

    for (position, element) in elements.iter().enumerate() {
        let x = BAR_MARGIN_LEFT + position as f32 * slot + spacing / 2.0;
        let top = scale_y(element.value);
        out.push(DrawCommand::Rect {
            x,
            y: BAR_MARGIN_TOP + top,
            width: bar_width,
            height: usable_height - top,
            corner_radius: 3.0,
            fill: palette.element(element.state),
        });
        out.push(DrawCommand::Text {
            x: x + bar_width / 2.0,
            y: BAR_MARGIN_TOP + top - 8.0,
            content: element.value.to_string(),
            size: label_size,
            fill: palette.bar_label,
            anchor: TextAnchor::Middle,
        });
    }
}

const TREE_MAX_WIDTH: f32 = 1200.0;
const TREE_INSET: f32 = 50.0;

#[derive(Debug, Clone, Copy)]
struct Placement {
    id: usize,
    parent: Option<usize>,
    x: f32,
    depth: usize,
}

/// Leaves are spaced one unit apart when they share a parent and two units
/// otherwise; every parent sits midway between its outermost children.
fn place(
    node: &Node,
    parent: Option<usize>,
    depth: usize,
    last_leaf: &mut Option<(f32, Option<usize>)>,
    out: &mut Vec<Placement>,
) -> f32 {
    let x = if node.children.is_empty() {
        let x = match *last_leaf {
            None => 0.0,
            Some((previous, previous_parent)) if previous_parent == parent => previous + 1.0,
            Some((previous, _)) => previous + 2.0,
        };
        *last_leaf = Some((x, parent));
        x
    } else {
        let xs: Vec<f32> = node
            .children
            .iter()
            .map(|child| place(child, Some(node.id), depth + 1, last_leaf, out))
            .collect();
        (xs[0] + xs[xs.len() - 1]) / 2.0
    };
    out.push(Placement {
        id: node.id,
        parent,
        x,
        depth,
    });
    x
}

/// Pixel centre of every node, keyed by id, in the order they are drawn.
pub fn tree_positions(root: &Node, canvas: Canvas) -> Vec<(usize, f32, f32)> {
    let mut placements = Vec::new();
    place(root, None, 0, &mut None, &mut placements);

    let (min_x, max_x) = placements
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
    let max_depth = placements.iter().map(|p| p.depth).max().unwrap_or(0);

    let tree_width = (canvas.width * 0.85).min(TREE_MAX_WIDTH);
    let spread = (tree_width - 2.0 * TREE_INSET).max(0.0);
    let left = (canvas.width - tree_width) / 2.0 + TREE_INSET;
    let levels = (canvas.height - 2.0 * TREE_INSET).max(0.0);

    placements
        .iter()
        .map(|p| {
            let fx = if max_x > min_x {
                (p.x - min_x) / (max_x - min_x)
            } else {
                0.5
            };
            let fy = if max_depth > 0 {
                p.depth as f32 / max_depth as f32
            } else {
                0.0
            };
            (p.id, left + fx * spread, TREE_INSET + fy * levels)
        })
        .collect()
}

fn layout_tree(root: &Node, canvas: Canvas, palette: &Palette, out: &mut Vec<DrawCommand>) {
    let mut placements = Vec::new();
    place(root, None, 0, &mut None, &mut placements);
    let positions = tree_positions(root, canvas);
    let at = |id: usize| {
        positions
            .iter()
            .find(|(node, _, _)| *node == id)
            .map(|&(_, x, y)| (x, y))
    };

    for placement in &placements {
        let (Some(parent), Some((x2, y2))) = (placement.parent, at(placement.id)) else {
            continue;
        };
        if let Some((x1, y1)) = at(parent) {
            out.push(DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                stroke: palette.edge,
                stroke_width: 2.0,
                dashed: false,
            });
        }
    }

    let radius = (canvas.width / 50.0).clamp(25.0, 30.0);
    let label_size = (canvas.width / 80.0).clamp(14.0, 16.0);
    for node in root.preorder() {
        let Some((cx, cy)) = at(node.id) else {
            continue;
        };
        out.push(DrawCommand::Circle {
            cx,
            cy,
            radius,
            fill: palette.node(node.state),
            stroke: palette.node_stroke,
            stroke_width: 3.0,
        });
        out.push(DrawCommand::Text {
            x: cx,
            y: cy,
            content: node.value.to_string(),
            size: label_size,
            fill: palette.node_label,
            anchor: TextAnchor::Middle,
        });
    }
}
