//! Drawing history: undo/redo stacks, the render lists and the timeline ring.
//!
//! Three structures track committed strokes and are allowed to disagree:
//!
//! - the undo/redo stacks, which move strokes back and forth;
//! - the unbounded render list, which drives normal display and is trimmed
//!   and extended by undo/redo;
//! - the bounded [`HistoryRing`], a pure append log that drives timeline
//!   scrubbing and is never touched by undo/redo.
//!
//! Once the ring evicts a stroke, scrubbing can no longer reach it even though
//! it still renders in live mode. Shapes live in their own list and take no
//! part in undo/redo or scrubbing.

use crate::shapes::Shape;
use crate::stroke::Stroke;
use serde::Serialize;
use std::sync::Arc;

/// Default number of strokes kept in the timeline ring.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Fixed-capacity circular log. Pushing into a full ring evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct HistoryRing<T> {
    slots: Box<[Option<T>]>,
    /// Slot holding the oldest entry.
    head: usize,
    len: usize,
}

impl<T> HistoryRing<T> {
    /// Create an empty ring. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = (0..capacity.max(1)).map(|_| None).collect::<Vec<_>>();
        Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Append an entry, returning the evicted oldest entry when full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let capacity = self.capacity();
        if self.len < capacity {
            let tail = (self.head + self.len) % capacity;
            self.slots[tail] = Some(item);
            self.len += 1;
            None
        } else {
            let evicted = self.slots[self.head].replace(item);
            self.head = (self.head + 1) % capacity;
            evicted
        }
    }

    /// Entry at logical `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots[(self.head + index) % self.capacity()].as_ref()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    /// Entries `0..=last`, oldest first.
    pub fn prefix(&self, last: usize) -> impl Iterator<Item = &T> + '_ {
        self.iter().take(last.saturating_add(1))
    }

    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }
}

/// Read-only counters describing the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    /// Committed strokes plus shapes currently in the render lists.
    pub total_actions: usize,
    /// Sampled points across all strokes in the render list.
    pub total_points: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
    /// Strokes currently held by the timeline ring.
    pub history_len: usize,
    /// Current scrub cursor into the ring.
    pub timeline_position: usize,
    pub scrubbing: bool,
}

/// Owner of every committed stroke and shape.
#[derive(Debug, Clone)]
pub struct History {
    ring: HistoryRing<Arc<Stroke>>,
    undo_stack: Vec<Arc<Stroke>>,
    redo_stack: Vec<Arc<Stroke>>,
    strokes: Vec<Arc<Stroke>>,
    shapes: Vec<Arc<Shape>>,
    cursor: usize,
    scrubbing: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// Create an empty history whose timeline ring holds `capacity` strokes.
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: HistoryRing::with_capacity(capacity),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            strokes: Vec::new(),
            shapes: Vec::new(),
            cursor: 0,
            scrubbing: false,
        }
    }

    /// Record a finished stroke.
    ///
    /// Pushes onto the undo stack, invalidates redo, appends to the ring and
    /// the render list, and moves the scrub cursor to the new entry.
    pub fn commit_stroke(&mut self, stroke: Stroke) {
        let stroke = Arc::new(stroke);
        self.undo_stack.push(Arc::clone(&stroke));
        self.redo_stack.clear();
        if let Some(evicted) = self.ring.push(Arc::clone(&stroke)) {
            log::trace!("Timeline ring evicted stroke {}", evicted.id());
        }
        self.strokes.push(stroke);
        self.cursor = self.ring.len() - 1;
        log::debug!(
            "Committed stroke ({} strokes, ring {}/{})",
            self.strokes.len(),
            self.ring.len(),
            self.ring.capacity()
        );
    }

    /// Record a finished shape. Shapes are not undoable.
    pub fn commit_shape(&mut self, shape: Shape) {
        log::debug!("Committed {} shape", shape.kind().name());
        self.shapes.push(Arc::new(shape));
    }

    /// Undo the most recent stroke.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(stroke) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(stroke);
        self.strokes.pop();
        true
    }

    /// Redo the last undone stroke.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(stroke) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(Arc::clone(&stroke));
        self.strokes.push(stroke);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop every stroke and shape and reset the timeline.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.strokes.clear();
        self.shapes.clear();
        self.ring.clear();
        self.cursor = 0;
        self.scrubbing = false;
    }

    /// Enter scrub mode at `index` (clamped to the ring).
    pub fn scrub_to(&mut self, index: usize) {
        self.cursor = index.min(self.ring.len().saturating_sub(1));
        self.scrubbing = true;
    }

    /// Leave scrub mode. Returns true if scrubbing was active.
    pub fn exit_scrub(&mut self) -> bool {
        std::mem::replace(&mut self.scrubbing, false)
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    /// Current scrub cursor.
    pub fn timeline_position(&self) -> usize {
        self.cursor
    }

    /// Strokes to draw: the scrubbed ring prefix while scrubbing, otherwise
    /// the full render list. Both are in commit order.
    pub fn visible_strokes(&self) -> Box<dyn Iterator<Item = &Stroke> + '_> {
        if self.scrubbing {
            if self.ring.is_empty() {
                return Box::new(std::iter::empty());
            }
            Box::new(self.ring.prefix(self.cursor).map(|s| &**s))
        } else {
            Box::new(self.strokes.iter().map(|s| &**s))
        }
    }

    /// Render list of strokes, in commit order.
    pub fn strokes(&self) -> &[Arc<Stroke>] {
        &self.strokes
    }

    /// Committed shapes, in commit order.
    pub fn shapes(&self) -> &[Arc<Shape>] {
        &self.shapes
    }

    pub fn ring(&self) -> &HistoryRing<Arc<Stroke>> {
        &self.ring
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            total_actions: self.strokes.len() + self.shapes.len(),
            total_points: self.strokes.iter().map(|s| s.len()).sum(),
            undo_depth: self.undo_stack.len(),
            redo_depth: self.redo_stack.len(),
            history_len: self.ring.len(),
            timeline_position: self.cursor,
            scrubbing: self.scrubbing,
        }
    }
}
