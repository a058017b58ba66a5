//! Live search over already-fetched listings

use crate::models::Property;

/// Whether `property` matches a search query.
///
/// The query is case-folded and looked for as a plain substring of the
/// title, the address and the deal type label. Any one field matching is enough.
pub fn matches_query(property: &Property, query: &str) -> bool {
    matches_needle(property, &query.to_lowercase())
}

fn matches_needle(property: &Property, needle: &str) -> bool {
    field_contains(&property.title, needle)
        || field_contains(&property.address, needle)
        || field_contains(property.deal_type.label(), needle)
}

fn field_contains(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}

/// Filter listings by a search query, keeping their original order.
/// An empty query keeps everything.
pub fn filter_properties<I, P>(properties: I, query: &str) -> Vec<P>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Property>,
{
    if query.is_empty() {
        return properties.into_iter().collect();
    }
    let needle = query.to_lowercase();
    properties
        .into_iter()
        .filter(|p| matches_needle(p.as_ref(), &needle))
        .collect()
}

impl AsRef<Property> for Property {
    fn as_ref(&self) -> &Property {
        self
    }
}

impl AsRef<Property> for crate::models::PropertyListing {
    fn as_ref(&self) -> &Property {
        &self.property
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DealType, PropertyListing};
    use chrono::Utc;

    fn property(id: &str, title: &str, address: &str, deal_type: DealType) -> Property {
        Property {
            id: id.to_string(),
            title: title.to_string(),
            address: address.to_string(),
            price: 100_000.0,
            deal_type,
            description: String::new(),
            images: vec![],
            created_at: Utc::now(),
            user_id: "owner".to_string(),
        }
    }

    fn sample() -> Vec<Property> {
        vec![
            property("1", "Lakeview Duplex", "12 Elm St", DealType::Brrrr),
            property("2", "Corner Bungalow", "4 Oak Ave", DealType::FixAndFlip),
            property("3", "Elmwood Fourplex", "99 Lake Rd", DealType::Both),
        ]
    }

    fn ids(found: &[Property]) -> Vec<&str> {
        found.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_keeps_everything_in_order() {
        let all = sample();
        let found = filter_properties(all.clone(), "");
        assert_eq!(found, all);
    }

    #[test]
    fn test_lakeview_duplex_queries() {
        let lakeview = vec![property("1", "Lakeview Duplex", "12 Elm St", DealType::Brrrr)];
        for query in ["lake", "elm", "brrrr", "LAKE", "Elm St"] {
            assert_eq!(filter_properties(lakeview.clone(), query).len(), 1, "query {}", query);
        }
        assert!(filter_properties(lakeview, "flip").is_empty());
    }

    #[test]
    fn test_flip_matches_deal_type_label() {
        let found = filter_properties(sample(), "flip");
        assert_eq!(ids(&found), vec!["2"]);
        assert!(matches_query(&sample()[1], "Fix & Flip"));
    }

    #[test]
    fn test_matches_across_fields_preserving_order() {
        // "elm" hits #1 by address and #3 by title; "lake" hits #1 by title and #3 by address
        assert_eq!(ids(&filter_properties(sample(), "elm")), vec!["1", "3"]);
        assert_eq!(ids(&filter_properties(sample(), "lake")), vec!["1", "3"]);
    }

    #[test]
    fn test_no_fuzzy_matching() {
        assert!(filter_properties(sample(), "lakevew").is_empty());
        assert!(filter_properties(sample(), "duplex lakeview").is_empty());
    }

    #[test]
    fn test_filters_borrowed_listings() {
        let listings: Vec<PropertyListing> = sample()
            .into_iter()
            .map(|property| PropertyListing {
                property,
                profiles: None,
            })
            .collect();
        let found = filter_properties(&listings, "oak");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].property.id, "2");
    }
}
