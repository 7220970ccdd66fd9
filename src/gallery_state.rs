// src/gallery_state.rs
use crate::image_candidates::CandidateList;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Loading(usize),
    Displaying(usize),
    /// Every candidate failed; the entity's fallback image is shown for good.
    Exhausted,
}

/// Which image a single card or gallery instance shows, and how it reacts
/// to load failures reported by the rendering surface.
///
/// A failed index is never retried automatically. Explicit selection may
/// move to any index that has not itself failed, backwards included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryState {
    entity_id: String,
    candidates: CandidateList,
    fallback: String,
    current: usize,
    failed: BTreeSet<usize>,
    status: ImageStatus,
}

impl GalleryState {
    pub fn mount(entity_id: &str, candidates: CandidateList, fallback: &str) -> Self {
        let status = if candidates.is_empty() {
            ImageStatus::Exhausted
        } else {
            ImageStatus::Loading(0)
        };
        Self {
            entity_id: entity_id.to_string(),
            candidates,
            fallback: fallback.to_string(),
            current: 0,
            failed: BTreeSet::new(),
            status,
        }
    }

    /// Full reset when the instance is pointed at another entity. Returns
    /// `false` and keeps all bookkeeping when the entity is unchanged.
    pub fn remount(&mut self, entity_id: &str, candidates: CandidateList, fallback: &str) -> bool {
        if self.entity_id == entity_id {
            return false;
        }
        *self = Self::mount(entity_id, candidates, fallback);
        true
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn status(&self) -> ImageStatus {
        self.status
    }

    pub fn is_exhausted(&self) -> bool {
        self.status == ImageStatus::Exhausted
    }

    pub fn is_failed(&self, index: usize) -> bool {
        self.failed.contains(&index)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn current_url(&self) -> &str {
        if self.is_exhausted() {
            return &self.fallback;
        }
        self.candidates
            .get(self.current)
            .unwrap_or(self.fallback.as_str())
    }

    pub fn report_loaded(&mut self, index: usize) -> bool {
        if self.status == ImageStatus::Loading(index) {
            self.status = ImageStatus::Displaying(index);
            true
        } else {
            false
        }
    }

    /// Records a load failure. When the shown image failed, moves to the next
    /// unfailed candidate after it, or the first unfailed one before it when
    /// nothing is left ahead. Returns whether anything changed.
    pub fn report_failure(&mut self, index: usize) -> bool {
        if index >= self.candidates.len() || !self.failed.insert(index) {
            return false;
        }

        if self.failed.len() == self.candidates.len() {
            log::debug!("All images failed for {}, pinning fallback", self.entity_id);
            self.status = ImageStatus::Exhausted;
            return true;
        }

        if index == self.current && !self.is_exhausted() {
            let next = self
                .unfailed_after(index)
                .or_else(|| self.unfailed_before(index));
            if let Some(next) = next {
                log::debug!("Image {} failed for {}, trying {}", index, self.entity_id, next);
                self.current = next;
                self.status = ImageStatus::Loading(next);
            }
        }
        true
    }

    /// Thumbnail click. Refused only for indices that failed themselves.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.candidates.len() || self.is_failed(index) || self.is_exhausted() {
            return false;
        }
        if index != self.current {
            self.current = index;
            self.status = ImageStatus::Loading(index);
        }
        true
    }

    pub fn has_next(&self) -> bool {
        !self.is_exhausted() && self.unfailed_after(self.current).is_some()
    }

    pub fn has_previous(&self) -> bool {
        !self.is_exhausted() && self.unfailed_before(self.current).is_some()
    }

    pub fn next(&mut self) -> bool {
        match self.unfailed_after(self.current) {
            Some(index) => self.select(index),
            None => false,
        }
    }

    pub fn previous(&mut self) -> bool {
        match self.unfailed_before(self.current) {
            Some(index) => self.select(index),
            None => false,
        }
    }

    fn unfailed_after(&self, index: usize) -> Option<usize> {
        (index + 1..self.candidates.len()).find(|i| !self.failed.contains(i))
    }

    fn unfailed_before(&self, index: usize) -> Option<usize> {
        (0..index.min(self.candidates.len()))
            .rev()
            .find(|i| !self.failed.contains(i))
    }
}
