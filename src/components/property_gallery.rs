// src/components/property_gallery.rs
use crate::components::{mount_gallery, GalleryAction};
use crate::gallery_state::ImageStatus;
use crate::property::Property;
use crate::site_config::SiteConfig;
use gloo_events::EventListener;
use gloo_utils::document;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

/// Thumbnails shown under the main image.
const THUMBNAIL_COUNT: usize = 4;

#[derive(Properties, PartialEq)]
pub struct PropertyGalleryProps {
    pub property: Property,
    pub config: Rc<SiteConfig>,
}

#[function_component(PropertyGallery)]
pub fn property_gallery(props: &PropertyGalleryProps) -> Html {
    let gallery = {
        let property = props.property.clone();
        let config = props.config.clone();
        use_reducer(move || mount_gallery(&property, &config))
    };

    {
        let dispatcher = gallery.dispatcher();
        let property = props.property.clone();
        let config = props.config.clone();
        use_effect_with(props.property.id.clone(), move |_| {
            dispatcher.dispatch(GalleryAction::Remount(mount_gallery(&property, &config)));
            || ()
        });
    }

    // ------ KEYBOARD NAVIGATION ------
    {
        let dispatcher = gallery.dispatcher();
        use_effect_with((), move |_| {
            let listener = EventListener::new(&document(), "keydown", move |event| {
                let Some(keyboard_event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                match keyboard_event.key().as_str() {
                    "ArrowRight" => {
                        dispatcher.dispatch(GalleryAction::Next);
                        keyboard_event.prevent_default();
                    }
                    "ArrowLeft" => {
                        dispatcher.dispatch(GalleryAction::Previous);
                        keyboard_event.prevent_default();
                    }
                    _ => {}
                }
            });

            // Cleanup closure
            || drop(listener)
        });
    }

    // ------ CHANGE IMAGES ------
    let next_image = {
        let dispatcher = gallery.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(GalleryAction::Next))
    };
    let prev_image = {
        let dispatcher = gallery.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(GalleryAction::Previous))
    };

    let current = gallery.current_index();
    let on_main_error = {
        let dispatcher = gallery.dispatcher();
        Callback::from(move |_: Event| dispatcher.dispatch(GalleryAction::Failed(current)))
    };
    let on_main_load = {
        let dispatcher = gallery.dispatcher();
        Callback::from(move |_: Event| dispatcher.dispatch(GalleryAction::Loaded(current)))
    };

    let title = props.property.title.clone();
    let candidates = gallery.candidates().urls().to_vec();
    let exhausted = gallery.is_exhausted();
    let stock = exhausted || gallery.candidates().is_synthesized();
    let main_class = classes!(
        "gallery-main",
        matches!(gallery.status(), ImageStatus::Loading(_)).then_some("loading")
    );

    let thumbnails = candidates
        .iter()
        .take(THUMBNAIL_COUNT)
        .enumerate()
        .filter(|(idx, _)| !gallery.is_failed(*idx))
        .map(|(idx, url)| {
            let onclick = {
                let dispatcher = gallery.dispatcher();
                Callback::from(move |_: MouseEvent| dispatcher.dispatch(GalleryAction::Select(idx)))
            };
            let onerror = {
                let dispatcher = gallery.dispatcher();
                Callback::from(move |_: Event| dispatcher.dispatch(GalleryAction::Failed(idx)))
            };
            let class = classes!(
                "thumbnail",
                (!exhausted && idx == current).then_some("active")
            );
            html! {
                <button key={idx} {class} {onclick}>
                    <img
                        src={url.clone()}
                        alt={format!("{} {}", title, idx + 1)}
                        {onerror}
                    />
                </button>
            }
        })
        .collect::<Html>();

    html! {
        <div class="property-gallery">
            <div class={main_class}>
                <img
                    src={gallery.current_url().to_string()}
                    alt={title.clone()}
                    onerror={on_main_error}
                    onload={on_main_load}
                />
                if stock {
                    <span class="stock-photo">{"Illustrative photo"}</span>
                }
            </div>

            <div class="gallery-controls">
                <button onclick={prev_image} disabled={!gallery.has_previous()} title="Previous (←)">{"← Prev"}</button>
                <button onclick={next_image} disabled={!gallery.has_next()} title="Next (→)">{"Next →"}</button>
                <span class="gallery-counter">
                    { if exhausted {
                        "No photos available".to_string()
                    } else {
                        format!("{}/{}", current + 1, candidates.len())
                    } }
                </span>
            </div>

            <div class="gallery-thumbnails">
                { thumbnails }
            </div>
        </div>
    }
}
