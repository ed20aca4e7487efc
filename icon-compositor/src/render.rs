//! The render pass: one left-to-right walk over an icon's layers.
//!
//! A pass owns the two pieces of state threaded through the walk:
//!
//! - the *path stack*, undrawn paths pushed by path producers and drained by
//!   path consumers;
//! - the *active transforms*, one entry per open `UntilReset` transform with
//!   the path stack length at the time it was opened. Paths from that index
//!   on still need the transform folded in.
//!
//! Drawables are awaited one at a time, so drawing on the surface is strictly
//! sequential.

use crate::error::RenderResult;
use crate::geometry::{Affine, Rect};
use crate::layers::{Layer, PathConsumer, PathProducer, TransformScope, Transformation};
use crate::path::CompositePath;
use icon_canvas::Canvas;
use log::{debug, warn};

/// An open `UntilReset` transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveTransform {
    pub affine: Affine,
    /// First path stack index this transform has not been folded into yet.
    pub start_index: usize,
}

pub struct RenderPass<'c> {
    canvas: &'c mut Canvas,
    rect: Rect,
    path_stack: Vec<CompositePath>,
    active_transforms: Vec<ActiveTransform>,
}

impl<'c> RenderPass<'c> {
    pub fn new(canvas: &'c mut Canvas, rect: Rect) -> Self {
        Self {
            canvas,
            rect,
            path_stack: Vec::new(),
            active_transforms: Vec::new(),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        self.canvas
    }

    pub fn path_stack(&self) -> &[CompositePath] {
        &self.path_stack
    }

    pub fn active_transforms(&self) -> &[ActiveTransform] {
        &self.active_transforms
    }

    /// Visit every layer once, in order. Empty slots are skipped.
    pub async fn run(&mut self, layers: &mut [Option<Layer>]) -> RenderResult<()> {
        let mut index = 0;
        while index < layers.len() {
            let Some(layer) = layers[index].as_mut() else {
                index += 1;
                continue;
            };
            if let Some(producer) = layer.as_path_producer_mut() {
                self.produce(producer);
            }
            if let Some(consumer) = layer.as_path_consumer_mut() {
                self.consume(consumer)?;
            }
            if let Some(transform) = layer.as_transform() {
                self.apply_transform(transform);
                index += 1;
                continue;
            }
            if layer.as_drawable_mut().is_some() {
                index = self.draw(layers, index).await?;
                continue;
            }
            index += 1;
        }
        if !self.path_stack.is_empty() {
            debug!("{} path(s) left unconsumed", self.path_stack.len());
        }
        if !self.active_transforms.is_empty() {
            warn!(
                "{} UntilReset transform(s) were never reset",
                self.active_transforms.len()
            );
        }
        Ok(())
    }

    /// Push the producer's path, which may have absorbed the previous top.
    pub fn produce(&mut self, producer: &mut dyn PathProducer) {
        if let Some(path) = producer.get_path(self.rect, &mut self.path_stack) {
            self.path_stack.push(path);
        }
    }

    /// Fold open transforms into the paths pushed since they were opened,
    /// then hand the whole stack to the consumer.
    ///
    /// Consumers drain the stack, so every open transform restarts at index 0.
    pub fn consume(&mut self, consumer: &mut dyn PathConsumer) -> RenderResult<()> {
        let len = self.path_stack.len();
        for active in self.active_transforms.iter_mut().rev() {
            if active.start_index < len {
                for path in &mut self.path_stack[active.start_index..] {
                    path.apply_affine(active.affine);
                }
            }
            active.start_index = 0;
        }
        consumer.render_paths(&mut self.path_stack, &mut *self.canvas, self.rect)
    }

    /// Dispatch a transform layer reached directly (not by a drawable's look-ahead).
    pub fn apply_transform(&mut self, transform: &Transformation) {
        let affine = transform.affine(self.rect);
        match transform.scope {
            TransformScope::UntilReset => {
                self.active_transforms.push(ActiveTransform {
                    affine,
                    start_index: self.path_stack.len(),
                });
                return;
            }
            TransformScope::Reset => {
                match self.active_transforms.pop() {
                    Some(active) => {
                        let start = active.start_index.min(self.path_stack.len());
                        for path in &mut self.path_stack[start..] {
                            path.apply_affine(active.affine);
                        }
                    }
                    None => warn!("Reset transform without an open UntilReset transform"),
                }
                return;
            }
            TransformScope::Cumulative => self.canvas.transform(affine),
            TransformScope::PreviousOne => {
                if self.path_stack.is_empty() {
                    warn!("PreviousOne transform has nothing to apply to");
                }
            }
        }

        // Cumulative and PreviousOne also fold into every pending path: open
        // transforms first, then this one.
        let len = self.path_stack.len();
        for active in self.active_transforms.iter_mut().rev() {
            for path in &mut self.path_stack {
                path.apply_affine(active.affine);
            }
            active.start_index = len;
        }
        for path in &mut self.path_stack {
            path.apply_affine(affine);
        }
    }

    /// Render the drawable at `index` under the open transforms and any
    /// directly following `PreviousOne` transforms. Returns the next index.
    async fn draw(&mut self, layers: &mut [Option<Layer>], index: usize) -> RenderResult<usize> {
        let mut saved: Option<Affine> = None;
        for active in &self.active_transforms {
            saved.get_or_insert_with(|| self.canvas.get_transform());
            self.canvas.transform(active.affine);
        }

        let mut next = index + 1;
        loop {
            match layers.get(next) {
                Some(None) => next += 1,
                Some(Some(Layer::Transformation(t))) if t.scope == TransformScope::PreviousOne => {
                    saved.get_or_insert_with(|| self.canvas.get_transform());
                    self.canvas.transform(t.affine(self.rect));
                    next += 1;
                }
                _ => break,
            }
        }

        let result = match layers[index].as_mut().and_then(Layer::as_drawable_mut) {
            Some(drawable) => drawable.render(&mut *self.canvas, self.rect).await,
            None => Ok(()),
        };
        if let Some(transform) = saved {
            self.canvas.set_transform(transform);
        }
        result.map(|_| next)
    }
}
