// src/property_source.rs
use crate::property::Property;
use crate::site_config::{DataSource, SiteConfig};
use gloo_net::http::Request;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] gloo_net::Error),

    #[error("listing endpoint returned status {0}")]
    Status(u16),

    #[error("listing payload contained no properties")]
    Empty,
}

/// Where a result set came from, for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Live,
    Substitute,
}

/// Listing records may come as a bare array or wrapped under `properties` or `data`.
pub fn listing_records(payload: &Value) -> &[Value] {
    match payload {
        Value::Array(items) => items,
        other => ["properties", "data"]
            .iter()
            .find_map(|key| other.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[]),
    }
}

pub fn parse_listings(payload: &Value) -> Vec<Property> {
    listing_records(payload)
        .iter()
        .filter_map(Property::from_record)
        .collect()
}

async fn fetch_live(url: &str) -> Result<Vec<Property>, FetchError> {
    let resp = Request::get(url).send().await?;
    if !resp.ok() {
        return Err(FetchError::Status(resp.status()));
    }
    let payload: Value = resp.json().await?;
    let properties = parse_listings(&payload);
    if properties.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(properties)
}

/// Never fails: any problem with the live feed yields the static substitute set.
pub async fn fetch_properties(config: &SiteConfig) -> (Vec<Property>, Origin) {
    if config.data_source == DataSource::Mock {
        return (mock_properties(), Origin::Substitute);
    }

    let url = config.properties_url();
    match fetch_live(&url).await {
        Ok(properties) => {
            log::info!("Loaded {} properties from {}", properties.len(), url);
            (properties, Origin::Live)
        }
        Err(e) => {
            log::warn!("Falling back to sample listings: {}", e);
            (mock_properties(), Origin::Substitute)
        }
    }
}

pub fn mock_properties() -> Vec<Property> {
    parse_listings(&mock_payload())
}

fn mock_payload() -> Value {
    json!([
        {
            "id": "1",
            "title": "Modern 3-Bedroom House Near University",
            "price": 75000,
            "address": "24 Campus View, Bradford",
            "city": "Bradford",
            "postcode": "BD7 1DP",
            "beds": 3,
            "baths": 2,
            "tenure": "Freehold",
            "yield": 8.5,
            "description": "Well maintained family house within walking distance of campus.",
            "image": "https://images.unsplash.com/photo-1568605114967-8130f3a36994?w=800",
            "images": [
                "https://images.unsplash.com/photo-1568605114967-8130f3a36994?w=800",
                "https://images.unsplash.com/photo-1564013799919-ab600027ffc6?w=800"
            ]
        },
        {
            "id": "2",
            "title": "Spacious 2-Bedroom Student Property",
            "price": 95000,
            "address": "12 Oxford Road, Manchester",
            "city": "Manchester",
            "postcode": "M13 9PL",
            "beds": 2,
            "baths": 1,
            "tenure": "Leasehold",
            "yield": 7.2,
            "description": "Close to public transport and university facilities.",
            "image": "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800",
            "images": [
                "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800",
                "https://images.unsplash.com/photo-1484154218962-a197022b5858?w=800"
            ]
        },
        {
            "id": "3",
            "title": "4-Bedroom House with High Yield",
            "price": 120000,
            "address": "8 Clarendon Terrace, Leeds",
            "city": "Leeds",
            "postcode": "LS2 8JT",
            "beds": 4,
            "baths": 2,
            "tenure": "Freehold",
            "yield": 9.8,
            "description": "Strong rental yield, suited to multiple tenants.",
            "image": "https://images.unsplash.com/photo-1600596542815-ffad4c1539a9?w=800",
            "images": [
                "https://images.unsplash.com/photo-1600596542815-ffad4c1539a9?w=800",
                "https://images.unsplash.com/photo-1600585154340-be6161a56a0c?w=800"
            ]
        },
        {
            "id": "4",
            "title": "Affordable 3-Bedroom Investment",
            "price": 65000,
            "address": "3 City Gate, Bradford",
            "city": "Bradford",
            "postcode": "BD1 1AA",
            "beds": 3,
            "baths": 1,
            "tenure": "Freehold",
            "yield": 8.2,
            "description": "Good value in a popular student area.",
            "image": "https://images.unsplash.com/photo-1600607687939-ce8a6c25118c?w=800"
        },
        {
            "id": "5",
            "title": "Premium 2-Bedroom Apartment",
            "price": 110000,
            "address": "19 City Tower, Manchester",
            "city": "Manchester",
            "postcode": "M1 1AD",
            "beds": 2,
            "baths": 2,
            "tenure": "Leasehold",
            "yield": 6.5,
            "description": "City centre apartment with a high-quality finish.",
            "image": "https://images.unsplash.com/photo-1600566753190-17f0baa2a6c3?w=800"
        },
        {
            "id": "6",
            "title": "Student HMO Opportunity",
            "price": 105000,
            "address": "52 Otley Road, Leeds",
            "city": "Leeds",
            "postcode": "LS6 2PA",
            "beds": 5,
            "baths": 2,
            "tenure": "Freehold",
            "yield": 10.5,
            "description": "Large property suited to HMO conversion."
        }
    ])
}
