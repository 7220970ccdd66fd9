// src/components/property_card.rs
use crate::components::{mount_gallery, GalleryAction};
use crate::property::Property;
use crate::site_config::SiteConfig;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PropertyCardProps {
    pub property: Property,
    pub config: Rc<SiteConfig>,
    pub on_open: Callback<String>,
}

#[function_component(PropertyCard)]
pub fn property_card(props: &PropertyCardProps) -> Html {
    let gallery = {
        let property = props.property.clone();
        let config = props.config.clone();
        use_reducer(move || mount_gallery(&property, &config))
    };

    // Reset when the card is reused for another listing
    {
        let dispatcher = gallery.dispatcher();
        let property = props.property.clone();
        let config = props.config.clone();
        use_effect_with(props.property.id.clone(), move |_| {
            dispatcher.dispatch(GalleryAction::Remount(mount_gallery(&property, &config)));
            || ()
        });
    }

    let index = gallery.current_index();
    let onerror = {
        let dispatcher = gallery.dispatcher();
        Callback::from(move |_: Event| dispatcher.dispatch(GalleryAction::Failed(index)))
    };
    let onload = {
        let dispatcher = gallery.dispatcher();
        Callback::from(move |_: Event| dispatcher.dispatch(GalleryAction::Loaded(index)))
    };
    let onclick = {
        let on_open = props.on_open.clone();
        let id = props.property.id.clone();
        Callback::from(move |_: MouseEvent| on_open.emit(id.clone()))
    };

    let property = &props.property;

    html! {
        <div class="property-card" {onclick}>
            <div class="property-card-image">
                <img
                    src={gallery.current_url().to_string()}
                    alt={property.title.clone()}
                    loading="lazy"
                    {onerror}
                    {onload}
                />
                if property.is_high_yield {
                    <span class="badge high-yield">{"High Yield"}</span>
                }
            </div>
            <div class="property-card-body">
                <h3>{property.title.clone()}</h3>
                <p class="price">{property.formatted_price()}</p>
                <p class="meta">
                    {format!("{} · {} bed", property.city, property.beds)}
                    if let Some(y) = property.gross_yield {
                        {format!(" · {:.1}% yield", y)}
                    }
                </p>
            </div>
        </div>
    }
}
