//! Nested viewports with their own local coordinate spaces.
//!
//! A viewport is a box placed at (x, y) inside its parent. Local (0, 0) is
//! the top-left corner of the box. Nodes live in an arena owned by
//! [`ViewportTree`]; the parent link is a plain index and ownership only
//! runs from parent to children.
//!
//! ```text
//! +------------------------------------------+
//! | root (0, 0, w, h)                        |
//! |    +-----------------+                   |
//! |    | map (5, 5)      |                   |
//! |    |                 |                   |
//! |    +-----------------+                   |
//! +------------------------------------------+
//! ```

use std::fmt;

use ratatui::style::{Color, Style};
use unicode_width::UnicodeWidthChar;

use crate::error::ScreenError;
use crate::surface::Surface;

/// Content callback. Receives the node being drawn and the surface, nothing else.
pub type ContentFn = Box<dyn Fn(ViewportRef<'_>, &mut dyn Surface)>;

/// Handle to a node of a [`ViewportTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewportId(usize);

impl fmt::Display for ViewportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Frame glyphs: top-left, top, top-right, right, bottom-right, bottom, bottom-left, left.
const SINGLE_BORDER: [char; 8] = ['┌', '─', '┐', '│', '┘', '─', '└', '│'];

/// Style used for frames and titles.
pub fn border_style(active: bool) -> Style {
    let fg = if active { Color::Red } else { Color::White };
    Style::default().bg(Color::Black).fg(fg)
}

struct Node {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    title: String,
    bordered: bool,
    active: bool,
    content: Option<ContentFn>,
    parent: Option<ViewportId>,
    children: Vec<ViewportId>,
}

/// Arena of viewports. Several independent roots may live in one tree.
#[derive(Default)]
pub struct ViewportTree {
    nodes: Vec<Node>,
}

impl ViewportTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a viewport at (x, y) of the given size. When `parent` is given
    /// the new node is appended to its children and drawn after them.
    pub fn create(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        parent: Option<ViewportId>,
    ) -> Result<ViewportId, ScreenError> {
        if width <= 0 || height <= 0 {
            return Err(ScreenError::InvalidSize { width, height });
        }
        if let Some(parent) = parent {
            self.node(parent)?;
        }

        let id = ViewportId(self.nodes.len());
        self.nodes.push(Node {
            x,
            y,
            width,
            height,
            title: String::new(),
            bordered: false,
            active: false,
            content: None,
            parent,
            children: Vec::new(),
        });

        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }

        Ok(id)
    }

    /// Attach a parentless node to `parent`. The child is drawn after the
    /// existing children.
    pub fn add_child(&mut self, parent: ViewportId, child: ViewportId) -> Result<(), ScreenError> {
        self.node(parent)?;
        if self.node(child)?.parent.is_some() {
            return Err(ScreenError::AlreadyOwned(child));
        }

        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(ScreenError::WouldCycle(child));
            }
            cursor = self.nodes[id.0].parent;
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    fn node(&self, id: ViewportId) -> Result<&Node, ScreenError> {
        self.nodes.get(id.0).ok_or(ScreenError::UnknownViewport(id))
    }

    fn node_mut(&mut self, id: ViewportId) -> Result<&mut Node, ScreenError> {
        self.nodes.get_mut(id.0).ok_or(ScreenError::UnknownViewport(id))
    }

    pub fn set_bordered(&mut self, id: ViewportId, bordered: bool) -> Result<(), ScreenError> {
        self.node_mut(id)?.bordered = bordered;
        Ok(())
    }

    pub fn set_active(&mut self, id: ViewportId, active: bool) -> Result<(), ScreenError> {
        self.node_mut(id)?.active = active;
        Ok(())
    }

    pub fn set_title(&mut self, id: ViewportId, title: impl Into<String>) -> Result<(), ScreenError> {
        self.node_mut(id)?.title = title.into();
        Ok(())
    }

    /// Install the content callback. It must capture whatever model state it draws.
    pub fn set_content<F>(&mut self, id: ViewportId, content: F) -> Result<(), ScreenError>
    where
        F: Fn(ViewportRef<'_>, &mut dyn Surface) + 'static,
    {
        self.node_mut(id)?.content = Some(Box::new(content));
        Ok(())
    }

    /// Read-only view of one node.
    pub fn view(&self, id: ViewportId) -> Result<ViewportRef<'_>, ScreenError> {
        let node = self.node(id)?;
        Ok(ViewportRef { tree: self, id, node })
    }

    pub fn parent(&self, id: ViewportId) -> Option<ViewportId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ViewportId) -> &[ViewportId] {
        self.nodes.get(id.0).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Absolute surface coordinates of local (x, y) inside `id`.
    ///
    /// Offsets of the node and every ancestor are summed. Only the root's
    /// size bounds the result; a node's own box never clips here.
    pub fn to_surface(&self, id: ViewportId, x: i32, y: i32) -> Result<(i32, i32), ScreenError> {
        let mut rx = x;
        let mut ry = y;

        let mut node = self.node(id)?;
        loop {
            rx = rx.saturating_add(node.x);
            ry = ry.saturating_add(node.y);
            match node.parent {
                Some(parent) => node = self.node(parent)?,
                None => break,
            }
        }

        if rx < 0 || ry < 0 || rx >= node.width || ry >= node.height {
            return Err(ScreenError::OutOfBounds { x: rx, y: ry });
        }
        Ok((rx, ry))
    }

    /// Draw `id` and its subtree: frame, title, content, then children in
    /// insertion order.
    pub fn draw(&self, id: ViewportId, surface: &mut dyn Surface) -> Result<(), ScreenError> {
        self.node(id)?;
        self.draw_node(id, surface);
        Ok(())
    }

    fn draw_node(&self, id: ViewportId, surface: &mut dyn Surface) {
        let node = &self.nodes[id.0];

        if node.bordered {
            self.draw_border(id, node, surface);
        }

        if let Some(content) = &node.content {
            content(ViewportRef { tree: self, id, node }, &mut *surface);
        }

        for &child in &node.children {
            self.draw_node(child, surface);
        }
    }

    fn draw_border(&self, id: ViewportId, node: &Node, surface: &mut dyn Surface) {
        let style = border_style(node.active);
        let (w, h) = (node.width, node.height);

        for x in 0..w {
            self.put(id, surface, x, 0, SINGLE_BORDER[1], style);
            self.put(id, surface, x, h - 1, SINGLE_BORDER[5], style);
        }
        for y in 0..h {
            self.put(id, surface, 0, y, SINGLE_BORDER[7], style);
            self.put(id, surface, w - 1, y, SINGLE_BORDER[3], style);
        }

        self.put(id, surface, 0, 0, SINGLE_BORDER[0], style);
        self.put(id, surface, w - 1, 0, SINGLE_BORDER[2], style);
        self.put(id, surface, w - 1, h - 1, SINGLE_BORDER[4], style);
        self.put(id, surface, 0, h - 1, SINGLE_BORDER[6], style);

        if !node.title.is_empty() {
            let label = format!("[ {} ]", node.title);
            self.put_str(id, surface, 2, 0, &label, style);
        }
    }

    /// Write one cell at local coordinates. Cells outside the root are skipped.
    fn put(&self, id: ViewportId, surface: &mut dyn Surface, x: i32, y: i32, glyph: char, style: Style) {
        if let Ok((sx, sy)) = self.to_surface(id, x, y) {
            surface.set_cell(sx, sy, glyph, style);
        }
    }

    /// Write text from local (x, y), advancing by display width. Zero-width
    /// characters take one blank cell.
    fn put_str(&self, id: ViewportId, surface: &mut dyn Surface, x: i32, y: i32, text: &str, style: Style) {
        let mut cx = x;
        for ch in text.chars() {
            let (glyph, width) = match ch.width() {
                Some(0) | None => (' ', 1),
                Some(w) => (ch, w as i32),
            };
            self.put(id, surface, cx, y, glyph, style);
            cx += width;
        }
    }
}

/// Borrowed view of a single viewport, handed to content callbacks.
#[derive(Clone, Copy)]
pub struct ViewportRef<'a> {
    tree: &'a ViewportTree,
    id: ViewportId,
    node: &'a Node,
}

impl<'a> ViewportRef<'a> {
    pub fn id(&self) -> ViewportId {
        self.id
    }

    pub fn x(&self) -> i32 {
        self.node.x
    }

    pub fn y(&self) -> i32 {
        self.node.y
    }

    pub fn width(&self) -> i32 {
        self.node.width
    }

    pub fn height(&self) -> i32 {
        self.node.height
    }

    pub fn bordered(&self) -> bool {
        self.node.bordered
    }

    pub fn active(&self) -> bool {
        self.node.active
    }

    pub fn title(&self) -> &'a str {
        &self.node.title
    }

    /// Local drawing area (x, y, width, height) left inside the frame.
    pub fn interior(&self) -> (i32, i32, i32, i32) {
        if self.node.bordered {
            (1, 1, (self.node.width - 2).max(0), (self.node.height - 2).max(0))
        } else {
            (0, 0, self.node.width, self.node.height)
        }
    }

    pub fn to_surface(&self, x: i32, y: i32) -> Result<(i32, i32), ScreenError> {
        self.tree.to_surface(self.id, x, y)
    }

    /// Write one cell at local (x, y); silently skipped outside the root.
    pub fn put(&self, surface: &mut dyn Surface, x: i32, y: i32, glyph: char, style: Style) {
        self.tree.put(self.id, surface, x, y, glyph, style);
    }

    /// Write text at local (x, y); cells outside the root are skipped.
    pub fn put_str(&self, surface: &mut dyn Surface, x: i32, y: i32, text: &str, style: Style) {
        self.tree.put_str(self.id, surface, x, y, text, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CellBuffer;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn fill(glyph: char) -> impl Fn(ViewportRef<'_>, &mut dyn Surface) {
        move |vp, surface| {
            for y in 0..vp.height() {
                for x in 0..vp.width() {
                    vp.put(surface, x, y, glyph, Style::default());
                }
            }
        }
    }

    #[test]
    fn test_nested_screen_coordinates() {
        let mut tree = ViewportTree::new();
        let root = tree.create(0, 0, 100, 100, None).unwrap();
        let child = tree.create(5, 7, 40, 40, Some(root)).unwrap();
        let child2 = tree.create(5, 46, 40, 10, Some(root)).unwrap();

        assert_eq!(tree.to_surface(child, 0, 0), Ok((5, 7)));
        assert_eq!(tree.to_surface(child, 10, 10), Ok((15, 17)));
        assert_eq!(tree.to_surface(child2, 10, 10), Ok((15, 56)));
        assert_eq!(tree.to_surface(root, 15, 15), Ok((15, 15)));
    }

    #[test]
    fn test_three_levels_accumulate() {
        let mut tree = ViewportTree::new();
        let root = tree.create(0, 0, 80, 24, None).unwrap();
        let panel = tree.create(10, 2, 40, 20, Some(root)).unwrap();
        let inner = tree.create(3, 4, 10, 5, Some(panel)).unwrap();
        assert_eq!(tree.to_surface(inner, 1, 1), Ok((14, 7)));
    }

    #[test]
    fn test_only_root_bounds_clip() {
        let mut tree = ViewportTree::new();
        let root = tree.create(0, 0, 100, 100, None).unwrap();
        let small = tree.create(5, 5, 10, 10, Some(root)).unwrap();

        // Beyond the child's own box but inside the root
        assert_eq!(tree.to_surface(small, 20, 20), Ok((25, 25)));
        assert_eq!(
            tree.to_surface(small, 95, 0),
            Err(ScreenError::OutOfBounds { x: 100, y: 5 })
        );
        assert_eq!(
            tree.to_surface(small, -6, 0),
            Err(ScreenError::OutOfBounds { x: -1, y: 5 })
        );
    }

    #[test]
    fn test_root_offset_is_applied() {
        let mut tree = ViewportTree::new();
        let root = tree.create(2, 3, 10, 10, None).unwrap();
        assert_eq!(tree.to_surface(root, 0, 0), Ok((2, 3)));
        assert!(tree.to_surface(root, 8, 0).is_err());
    }

    #[test]
    fn test_construction_errors() {
        let mut tree = ViewportTree::new();
        assert_eq!(
            tree.create(0, 0, 0, 5, None),
            Err(ScreenError::InvalidSize { width: 0, height: 5 })
        );
        assert_eq!(
            tree.create(0, 0, 5, -1, None),
            Err(ScreenError::InvalidSize { width: 5, height: -1 })
        );
        let missing = ViewportId(42);
        assert_eq!(
            tree.create(0, 0, 5, 5, Some(missing)),
            Err(ScreenError::UnknownViewport(missing))
        );
        assert!(tree.is_empty());
    }

    #[test]
    fn test_add_child_keeps_single_owner() {
        let mut tree = ViewportTree::new();
        let root = tree.create(0, 0, 20, 20, None).unwrap();
        let other = tree.create(0, 0, 20, 20, None).unwrap();
        let child = tree.create(1, 1, 5, 5, Some(root)).unwrap();

        assert_eq!(tree.add_child(other, child), Err(ScreenError::AlreadyOwned(child)));
        assert_eq!(tree.add_child(root, root), Err(ScreenError::WouldCycle(root)));
        assert_eq!(tree.add_child(child, root), Err(ScreenError::WouldCycle(root)));

        tree.add_child(root, other).unwrap();
        assert_eq!(tree.children(root), &[child, other]);
        assert_eq!(tree.parent(other), Some(root));
    }

    #[test]
    fn test_border_and_title() {
        let mut tree = ViewportTree::new();
        let root = tree.create(0, 0, 12, 3, None).unwrap();
        tree.set_bordered(root, true).unwrap();
        tree.set_title(root, "Map").unwrap();

        let mut surface = CellBuffer::new(12, 3);
        tree.draw(root, &mut surface).unwrap();

        assert_eq!(surface.row_text(0), "┌─[ Map ]──┐");
        assert_eq!(surface.row_text(1), "│          │");
        assert_eq!(surface.row_text(2), "└──────────┘");
        assert_eq!(surface.get(0, 0).unwrap().1, border_style(false));
    }

    #[test]
    fn test_title_needs_border() {
        let mut tree = ViewportTree::new();
        let root = tree.create(0, 0, 12, 3, None).unwrap();
        tree.set_title(root, "Map").unwrap();

        let mut surface = CellBuffer::new(12, 3);
        tree.draw(root, &mut surface).unwrap();
        assert_eq!(surface.writes(), 0);
    }

    #[test]
    fn test_active_border_style() {
        let mut tree = ViewportTree::new();
        let root = tree.create(0, 0, 4, 4, None).unwrap();
        tree.set_bordered(root, true).unwrap();
        tree.set_active(root, true).unwrap();

        let mut surface = CellBuffer::new(4, 4);
        tree.draw(root, &mut surface).unwrap();
        let (glyph, style) = surface.get(3, 3).unwrap();
        assert_eq!(glyph, '┘');
        assert_eq!(style.fg, Some(Color::Red));
    }

    #[test]
    fn test_later_siblings_draw_over_earlier() {
        let mut tree = ViewportTree::new();
        let root = tree.create(0, 0, 10, 4, None).unwrap();
        let first = tree.create(0, 0, 6, 4, Some(root)).unwrap();
        let second = tree.create(4, 0, 6, 4, Some(root)).unwrap();
        tree.set_content(root, fill('.')).unwrap();
        tree.set_content(first, fill('a')).unwrap();
        tree.set_content(second, fill('b')).unwrap();

        let mut surface = CellBuffer::new(10, 4);
        tree.draw(root, &mut surface).unwrap();
        assert_eq!(surface.row_text(0), "aaaabbbbbb");
    }

    #[test]
    fn test_children_draw_over_parent_frame() {
        let mut tree = ViewportTree::new();
        let root = tree.create(0, 0, 6, 3, None).unwrap();
        tree.set_bordered(root, true).unwrap();
        let child = tree.create(0, 0, 2, 1, Some(root)).unwrap();
        tree.set_content(child, fill('x')).unwrap();

        let mut surface = CellBuffer::new(6, 3);
        tree.draw(root, &mut surface).unwrap();
        assert_eq!(surface.row_text(0), "xx───┐");
    }

    #[test]
    fn test_oversized_child_is_clipped_by_root() {
        let mut tree = ViewportTree::new();
        let root = tree.create(0, 0, 5, 5, None).unwrap();
        let child = tree.create(3, 3, 10, 10, Some(root)).unwrap();
        tree.set_bordered(child, true).unwrap();
        tree.set_content(child, fill('#')).unwrap();

        let mut surface = CellBuffer::new(20, 20);
        tree.draw(root, &mut surface).unwrap();

        assert_eq!(surface.glyph(3, 3), Some('#'));
        assert_eq!(surface.glyph(4, 4), Some('#'));
        assert_eq!(surface.glyph(5, 5), Some(' '));
        assert_eq!(surface.glyph(3, 5), Some(' '));
    }

    #[test]
    fn test_content_receives_node() {
        let mut tree = ViewportTree::new();
        let root = tree.create(0, 0, 30, 10, None).unwrap();
        let child = tree.create(2, 1, 7, 3, Some(root)).unwrap();
        tree.set_bordered(child, true).unwrap();

        let seen = Rc::new(Cell::new((0, 0, 0, 0)));
        let sink = seen.clone();
        tree.set_content(child, move |vp, _| sink.set(vp.interior())).unwrap();

        let mut surface = CellBuffer::new(30, 10);
        tree.draw(root, &mut surface).unwrap();
        assert_eq!(seen.get(), (1, 1, 5, 1));
    }

    #[test]
    fn test_draw_unknown_root() {
        let tree = ViewportTree::new();
        let mut surface = CellBuffer::new(1, 1);
        assert!(tree.draw(ViewportId(0), &mut surface).is_err());
    }

    proptest! {
        #[test]
        fn prop_transform_sums_ancestor_offsets(
            offsets in prop::collection::vec((-20i32..60, -20i32..60), 1..5),
            lx in -10i32..40,
            ly in -10i32..40,
        ) {
            let mut tree = ViewportTree::new();
            let root = tree.create(0, 0, 100, 80, None).unwrap();
            let mut leaf = root;
            for (x, y) in &offsets {
                leaf = tree.create(*x, *y, 10, 10, Some(leaf)).unwrap();
            }

            let sx = lx + offsets.iter().map(|o| o.0).sum::<i32>();
            let sy = ly + offsets.iter().map(|o| o.1).sum::<i32>();
            let inside = sx >= 0 && sy >= 0 && sx < 100 && sy < 80;

            match tree.to_surface(leaf, lx, ly) {
                Ok(point) => {
                    prop_assert!(inside);
                    prop_assert_eq!(point, (sx, sy));
                }
                Err(e) => {
                    prop_assert!(!inside);
                    prop_assert_eq!(e, ScreenError::OutOfBounds { x: sx, y: sy });
                }
            }
        }
    }
}
