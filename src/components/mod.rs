// src/components/mod.rs
pub mod property_card;
pub mod property_gallery;

use crate::gallery_state::GalleryState;
use crate::image_candidates::CandidateBuilder;
use crate::property::Property;
use crate::site_config::SiteConfig;
use std::rc::Rc;
use yew::Reducible;

/// Events a rendered image instance feeds back into its `GalleryState`.
pub enum GalleryAction {
    Loaded(usize),
    Failed(usize),
    Select(usize),
    Next,
    Previous,
    Remount(GalleryState),
}

impl Reducible for GalleryState {
    type Action = GalleryAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        let changed = match action {
            GalleryAction::Loaded(index) => next.report_loaded(index),
            GalleryAction::Failed(index) => next.report_failure(index),
            GalleryAction::Select(index) => next.select(index),
            GalleryAction::Next => next.next(),
            GalleryAction::Previous => next.previous(),
            GalleryAction::Remount(fresh) => {
                next.remount(fresh.entity_id(), fresh.candidates().clone(), fresh.fallback())
            }
        };
        if changed {
            Rc::new(next)
        } else {
            self
        }
    }
}

/// Fresh presentation state for a listing under the given configuration.
pub fn mount_gallery(property: &Property, config: &SiteConfig) -> GalleryState {
    let candidates = CandidateBuilder::from_config(config).build(&property.id, &property.images);
    let fallback = config.fallback_catalog.primary_for(&property.id);
    GalleryState::mount(&property.id, candidates, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property_source::mock_properties;

    #[test]
    fn reducer_keeps_state_when_nothing_changes() {
        let config = SiteConfig::default();
        let property = &mock_properties()[0];
        let state = Rc::new(mount_gallery(property, &config));

        let same = state.clone().reduce(GalleryAction::Previous);
        assert!(Rc::ptr_eq(&state, &same));

        let failed = state.clone().reduce(GalleryAction::Failed(0));
        assert!(!Rc::ptr_eq(&state, &failed));
        assert_eq!(failed.current_index(), 1);
    }

    #[test]
    fn exhausted_gallery_shows_catalog_image_for_listing() {
        let config = SiteConfig::default();
        for property in mock_properties() {
            let mut state = Rc::new(mount_gallery(&property, &config));
            while !state.is_exhausted() {
                let current = state.current_index();
                state = state.reduce(GalleryAction::Failed(current));
            }
            assert_eq!(
                state.current_url(),
                config.fallback_catalog.primary_for(&property.id)
            );
        }
    }

    #[test]
    fn remount_action_swaps_entity() {
        let config = SiteConfig::default();
        let properties = mock_properties();
        let state = Rc::new(mount_gallery(&properties[0], &config));
        let state = state.reduce(GalleryAction::Failed(0));

        let next = state.reduce(GalleryAction::Remount(mount_gallery(&properties[5], &config)));
        assert_eq!(next.entity_id(), "6");
        assert!(!next.is_failed(0));
        assert!(next.candidates().is_synthesized());
        assert_eq!(next.fallback(), config.fallback_catalog.primary_for("6"));
    }
}
