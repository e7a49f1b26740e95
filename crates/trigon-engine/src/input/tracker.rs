use std::collections::HashMap;

use crate::coords::{Bounds, Vec2};

use super::types::{MotionAction, MotionSample, TouchEvent, TouchPhase};

/// Tracks the last normalized position of every finger currently down.
///
/// Tracking inconsistencies (unknown ids, duplicate downs) are logged and
/// tolerated; the host may deliver events out of order and losing a touch is
/// preferable to failing the frame.
#[derive(Debug, Default)]
pub struct TouchTracker {
    /// Pointer id -> last normalized position.
    positions: HashMap<i32, Vec2>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fingers currently tracked.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Last normalized position recorded for `id`.
    pub fn position(&self, id: i32) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }

    /// Forgets every tracked finger.
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Normalizes one raw motion sample and hands each resulting touch event to
    /// `emit`.
    ///
    /// Down registers the finger before `emit` runs; Up runs `emit` before the
    /// finger is forgotten. Move emits one event per pointer that has a record.
    pub fn process<F>(&mut self, sample: &MotionSample, bounds: Bounds, mut emit: F)
    where
        F: FnMut(&TouchEvent<'_>),
    {
        if sample.pointers.is_empty() {
            return;
        }

        if !bounds.is_valid() {
            log::debug!(
                "dropping {:?} sample: surface bounds {:?} not known yet",
                sample.action,
                bounds.max
            );
            return;
        }

        match sample.action {
            MotionAction::Down => self.pointer_down(sample, 0, bounds, &mut emit),
            MotionAction::PointerDown { index } => {
                self.pointer_down(sample, index, bounds, &mut emit)
            }
            MotionAction::Up => self.pointer_up(sample, 0, bounds, &mut emit),
            MotionAction::PointerUp { index } => self.pointer_up(sample, index, bounds, &mut emit),
            MotionAction::Move => self.pointers_moved(sample, bounds, &mut emit),
            MotionAction::Cancel => {
                log::debug!("gesture cancelled, forgetting {} pointer(s)", self.len());
                self.clear();
            }
            MotionAction::Other => {}
        }
    }

    fn pointer_down<F>(&mut self, sample: &MotionSample, index: usize, bounds: Bounds, emit: &mut F)
    where
        F: FnMut(&TouchEvent<'_>),
    {
        let Some(ev) = cook(sample, index, bounds, TouchPhase::Down) else {
            return;
        };

        if self.positions.insert(ev.id, ev.norm_pos).is_some() {
            log::warn!("pointer {} went down while already tracked; position reset", ev.id);
        }

        emit(&ev);
    }

    fn pointer_up<F>(&mut self, sample: &MotionSample, index: usize, bounds: Bounds, emit: &mut F)
    where
        F: FnMut(&TouchEvent<'_>),
    {
        let Some(ev) = cook(sample, index, bounds, TouchPhase::Up) else {
            return;
        };

        emit(&ev);

        if self.positions.remove(&ev.id).is_none() {
            log::warn!("pointer {} went up but was not tracked", ev.id);
        }
    }

    fn pointers_moved<F>(&mut self, sample: &MotionSample, bounds: Bounds, emit: &mut F)
    where
        F: FnMut(&TouchEvent<'_>),
    {
        for (index, pointer) in sample.pointers.iter().enumerate() {
            let norm_pos = bounds.normalize(pointer.position());

            let Some(previous) = self.positions.get_mut(&pointer.id) else {
                log::warn!("pointer {} moved without a prior down; skipped", pointer.id);
                continue;
            };

            let delta = norm_pos - *previous;
            *previous = norm_pos;

            emit(&TouchEvent {
                phase: TouchPhase::Move { delta },
                id: pointer.id,
                pos: pointer.position(),
                norm_pos,
                bounds,
                pointer_index: index,
                source: sample,
            });
        }
    }
}

/// Resolves `index` inside `sample` and builds the event for it.
fn cook(
    sample: &MotionSample,
    index: usize,
    bounds: Bounds,
    phase: TouchPhase,
) -> Option<TouchEvent<'_>> {
    let Some(pointer) = sample.pointers.get(index) else {
        log::warn!(
            "{:?} refers to pointer index {index} but sample has {} pointer(s)",
            sample.action,
            sample.pointer_count()
        );
        return None;
    };

    Some(TouchEvent {
        phase,
        id: pointer.id,
        pos: pointer.position(),
        norm_pos: bounds.normalize(pointer.position()),
        bounds,
        pointer_index: index,
        source: sample,
    })
}
