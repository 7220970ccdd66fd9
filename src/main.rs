// src/main.rs
mod components;
mod fallback_catalog;
mod gallery_state;
mod image_candidates;
mod image_url;
mod property;
mod property_source;
mod site_config;
mod utils;

use components::property_card::PropertyCard;
use components::property_gallery::PropertyGallery;
use property::Property;
use property_source::{fetch_properties, Origin};
use site_config::{load_site_config, SiteConfig, SITE_CONFIG_PATH};
use std::rc::Rc;
use utils::resource_url;
use yew::prelude::*;

pub enum AppMsg {
    ConfigLoaded(SiteConfig),
    PropertiesLoaded(Vec<Property>, Origin),
    OpenProperty(String),
    CloseProperty,
}

pub struct App {
    config: Option<Rc<SiteConfig>>,
    properties: Vec<Property>,
    origin: Option<Origin>,
    selected: Option<String>,
    loading: bool,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        // Config first; listings are fetched once the backend URL is known
        let config_url = resource_url(SITE_CONFIG_PATH);
        ctx.link()
            .send_future(async move { AppMsg::ConfigLoaded(load_site_config(&config_url).await) });

        Self {
            config: None,
            properties: Vec::new(),
            origin: None,
            selected: None,
            loading: true,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::ConfigLoaded(config) => {
                let config = Rc::new(config);
                self.config = Some(config.clone());
                ctx.link().send_future(async move {
                    let (properties, origin) = fetch_properties(&config).await;
                    AppMsg::PropertiesLoaded(properties, origin)
                });
                false
            }
            AppMsg::PropertiesLoaded(properties, origin) => {
                self.properties = properties;
                self.origin = Some(origin);
                self.loading = false;
                true
            }
            AppMsg::OpenProperty(id) => {
                self.selected = Some(id);
                true
            }
            AppMsg::CloseProperty => {
                self.selected = None;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let config = match (&self.config, self.loading) {
            (Some(config), false) => config.clone(),
            _ => {
                return html! {
                    <div class="app-container">
                        <header class="app-header">
                            <h1>{"Investment Properties"}</h1>
                        </header>
                        <main class="app-main">
                            <div class="loading">{"Loading properties..."}</div>
                        </main>
                    </div>
                };
            }
        };

        let on_open = ctx.link().callback(AppMsg::OpenProperty);
        let on_close = ctx.link().callback(|_: MouseEvent| AppMsg::CloseProperty);

        let selected = self
            .selected
            .as_ref()
            .and_then(|id| self.properties.iter().find(|p| &p.id == id))
            .cloned();

        html! {
            <div class="app-container">
                <header class="app-header">
                    <h1>{"Investment Properties"}</h1>
                    if self.origin == Some(Origin::Substitute) {
                        <p class="subtitle">{"Showing sample listings while the live feed is unavailable."}</p>
                    }
                </header>

                <main class="app-main">
                    if let Some(property) = selected {
                        <section class="property-detail">
                            <button class="close" onclick={on_close}>{"← Back to listings"}</button>
                            <h2>{property.title.clone()}</h2>
                            <p class="address">{property.address.clone()}</p>
                            <PropertyGallery key={property.id.clone()} property={property.clone()} config={config.clone()} />
                            <p class="price">{property.formatted_price()}</p>
                            <ul class="facts">
                                <li>{format!("{} beds", property.beds)}</li>
                                if let Some(baths) = property.baths {
                                    <li>{format!("{} baths", baths)}</li>
                                }
                                if let Some(tenure) = property.tenure.clone() {
                                    <li>{tenure}</li>
                                }
                            </ul>
                            <p class="description">{property.description.clone()}</p>
                            <a class="source-link" href={property.source_url.clone()} target="_blank" rel="noopener noreferrer">
                                {"View original listing"}
                            </a>
                        </section>
                    }

                    <div class="property-grid">
                        {for self.properties.iter().map(|property| {
                            html! {
                                <PropertyCard
                                    key={property.id.clone()}
                                    property={property.clone()}
                                    config={config.clone()}
                                    on_open={on_open.clone()}
                                />
                            }
                        })}
                    </div>
                </main>

                <footer class="app-footer">
                    <p>{format!("{} properties", self.properties.len())}</p>
                </footer>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
