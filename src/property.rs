// src/property.rs
use crate::image_candidates::NormalizedImageSources;
use serde_json::Value;

/// Yield (percent) from which a listing is flagged as high-yield.
pub const HIGH_YIELD_THRESHOLD: f64 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub currency: String,
    pub address: String,
    pub city: String,
    pub postcode: String,
    pub beds: u32,
    pub baths: Option<u32>,
    pub tenure: Option<String>,
    pub gross_yield: Option<f64>,
    pub is_high_yield: bool,
    pub description: String,
    pub source_url: String,
    pub images: NormalizedImageSources,
}

impl Property {
    /// Lenient mapping from a feed record. Returns `None` only when the
    /// record carries no usable id.
    pub fn from_record(record: &Value) -> Option<Self> {
        let id = id_of(record)?;

        let city = text(record, &["city"])
            .or_else(|| record.pointer("/address/city").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| "Unknown".to_string());
        let postcode = text(record, &["postcode"])
            .or_else(|| {
                record
                    .pointer("/address/postcode")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default();
        let gross_yield = number(record, &["yield", "yieldPercentage", "grossYield"]);
        let is_high_yield = match gross_yield {
            Some(y) => y >= HIGH_YIELD_THRESHOLD,
            None => record.get("isHighYield").and_then(Value::as_bool).unwrap_or(false),
        };

        Some(Self {
            title: text(record, &["title", "name"])
                .unwrap_or_else(|| format!("{} Investment Property", city)),
            price: number(record, &["price", "listPrice"]).unwrap_or(0.0),
            currency: text(record, &["currency", "priceCurrency"])
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| "GBP".to_string()),
            address: address_of(record, &city, &postcode),
            beds: number(record, &["beds", "bedrooms"]).map_or(0, |n| n.max(0.0) as u32),
            baths: number(record, &["baths", "bathrooms"]).map(|n| n.max(0.0) as u32),
            tenure: text(record, &["tenure"]),
            gross_yield,
            is_high_yield,
            description: text(record, &["description", "details"]).unwrap_or_default(),
            source_url: text(record, &["sourceUrl", "originalListingUrl", "url"])
                .unwrap_or_else(|| "#".to_string()),
            images: NormalizedImageSources::from_record(record),
            id,
            city,
            postcode,
        })
    }

    pub fn formatted_price(&self) -> String {
        let whole = self.price.round().max(0.0) as u64;
        let digits = whole.to_string();
        let mut grouped = String::new();
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let symbol = match self.currency.as_str() {
            "GBP" => "£",
            "EUR" => "€",
            "USD" => "$",
            _ => "",
        };
        if symbol.is_empty() {
            format!("{} {}", grouped, self.currency)
        } else {
            format!("{}{}", symbol, grouped)
        }
    }
}

fn id_of(record: &Value) -> Option<String> {
    ["id", "_id"].iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        record
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Numbers may arrive as JSON numbers or numeric strings.
fn number(record: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn address_of(record: &Value, city: &str, postcode: &str) -> String {
    if let Some(address) = record.get("address").and_then(Value::as_str) {
        return address.to_string();
    }
    if let Some(full) = text(record, &["fullAddress"]) {
        return full;
    }
    let street = record
        .pointer("/address/street")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| text(record, &["street"]));
    [street.as_deref(), Some(city), Some(postcode)]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_alternate_field_names() {
        let record = json!({
            "_id": 42,
            "name": "Terrace",
            "listPrice": "95000",
            "bedrooms": 3,
            "bathrooms": 1,
            "grossYield": 8.4,
            "priceCurrency": "gbp",
            "address": { "street": "1 High St", "city": "Leeds", "postcode": "LS1 1AA" },
            "image": "https://cdn.example.com/a.jpg",
        });
        let property = Property::from_record(&record).unwrap();
        assert_eq!(property.id, "42");
        assert_eq!(property.title, "Terrace");
        assert_eq!(property.price, 95000.0);
        assert_eq!(property.beds, 3);
        assert_eq!(property.baths, Some(1));
        assert_eq!(property.currency, "GBP");
        assert_eq!(property.city, "Leeds");
        assert_eq!(property.address, "1 High St, Leeds, LS1 1AA");
        assert!(property.is_high_yield);
        assert_eq!(property.images.primary.as_deref(), Some("https://cdn.example.com/a.jpg"));
    }

    #[test]
    fn sparse_record_gets_defaults() {
        let property = Property::from_record(&json!({ "id": "p9" })).unwrap();
        assert_eq!(property.title, "Unknown Investment Property");
        assert_eq!(property.currency, "GBP");
        assert_eq!(property.source_url, "#");
        assert_eq!(property.address, "Unknown");
        assert!(!property.is_high_yield);
        assert!(property.images.is_empty());
    }

    #[test]
    fn record_without_id_is_skipped() {
        assert!(Property::from_record(&json!({ "title": "No id" })).is_none());
        assert!(Property::from_record(&json!({ "id": "  " })).is_none());
    }

    #[test]
    fn price_is_grouped_with_symbol() {
        let mut property = Property::from_record(&json!({ "id": "1", "price": 1234567 })).unwrap();
        assert_eq!(property.formatted_price(), "£1,234,567");
        property.currency = "CHF".into();
        property.price = 950.0;
        assert_eq!(property.formatted_price(), "950 CHF");
    }
}
