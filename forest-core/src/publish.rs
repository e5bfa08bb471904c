//! Layout-change publishing and animation pacing.
//!
//! The layout engine publishes after every placement and every
//! re-centering: observers are notified synchronously in registration
//! order, then the traversal sleeps for one tick so an external renderer
//! can redraw between partial layouts. When the renderer lives on another
//! thread it subscribes a [`FrameSender`], receiving immutable
//! [`LayoutFrame`] snapshots over a channel instead of sharing the nodes.

use crate::forest::Forest;
use glam::IVec2;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Callback contract for consumers of incremental layout states.
///
/// Observers register once, before layout begins; there is no dynamic
/// leave or rejoin mid-animation.
pub trait LayoutObserver {
    fn layout_changed(&mut self, forest: &Forest);
}

/// Registration list of observers plus the pacing delay between updates.
pub struct LayoutPublisher {
    observers: Vec<Box<dyn LayoutObserver + Send>>,
    tick: Duration,
}

impl LayoutPublisher {
    pub fn new(tick: Duration) -> Self {
        Self {
            observers: Vec::new(),
            tick,
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn LayoutObserver + Send>) {
        self.observers.push(observer);
    }

    /// Notifies every observer synchronously, in registration order.
    pub fn notify_all(&mut self, forest: &Forest) {
        for observer in &mut self.observers {
            observer.layout_changed(forest);
        }
    }

    /// Suspends the layout thread so a renderer has time to redraw.
    pub fn pace(&self) {
        if !self.tick.is_zero() {
            thread::sleep(self.tick);
        }
    }

    /// One notification-then-pace round trip. The layout engine calls this
    /// exactly once per placement and once per re-centering.
    pub fn publish(&mut self, forest: &Forest) {
        self.notify_all(forest);
        self.pace();
    }
}

/// View position and box width of one parent, enough to draw the
/// connecting line from a child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParentAnchor {
    pub pos: IVec2,
    pub width: i32,
}

/// Everything a renderer needs for one node: a labeled box plus one
/// connector per parent edge.
#[derive(Clone, Debug)]
pub struct NodeSprite {
    pub name: String,
    pub pos: IVec2,
    pub width: i32,
    pub parent_anchors: Vec<ParentAnchor>,
}

/// An immutable snapshot of the forest's view positions.
#[derive(Clone, Debug, Default)]
pub struct LayoutFrame {
    /// Sprites in name order, the order nodes are presented in.
    pub sprites: Vec<NodeSprite>,
}

impl LayoutFrame {
    pub fn capture(forest: &Forest) -> Self {
        let sprites = forest
            .presentation_order()
            .into_iter()
            .map(|id| {
                let node = &forest.nodes[id];
                let parent_anchors = node
                    .parents
                    .iter()
                    .map(|&p| ParentAnchor {
                        pos: forest.nodes[p].view_pos,
                        width: forest.nodes[p].display_width,
                    })
                    .collect();
                NodeSprite {
                    name: node.name.clone(),
                    pos: node.view_pos,
                    width: node.display_width,
                    parent_anchors,
                }
            })
            .collect();
        Self { sprites }
    }
}

/// Observer that ships each published state to a renderer thread.
pub struct FrameSender {
    tx: mpsc::Sender<LayoutFrame>,
}

impl FrameSender {
    pub fn new(tx: mpsc::Sender<LayoutFrame>) -> Self {
        Self { tx }
    }
}

impl LayoutObserver for FrameSender {
    fn layout_changed(&mut self, forest: &Forest) {
        // The viewer may have closed; the traversal still runs to completion.
        let _ = self.tx.send(LayoutFrame::capture(forest));
    }
}
