use crate::models::AdvisorRequest;
use tracing::warn;

/// Find the advisor request attached to a property.
///
/// Returns the first match in the order given. Callers list requests newest
/// first, so that is the latest request. More than one match is logged.
pub fn request_for_property<'a>(
    property_id: &str,
    requests: &'a [AdvisorRequest],
) -> Option<&'a AdvisorRequest> {
    let mut matches = requests.iter().filter(|r| r.property_id == property_id);
    let first = matches.next()?;

    let extra = matches.count();
    if extra > 0 {
        warn!(
            property_id,
            chosen = %first.id,
            matches = extra + 1,
            "Multiple advisor requests reference one property"
        );
    }

    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestStatus;
    use chrono::Utc;

    fn request(id: &str, property_id: &str) -> AdvisorRequest {
        AdvisorRequest {
            id: id.to_string(),
            property_id: property_id.to_string(),
            user_id: "user-1".to_string(),
            status: RequestStatus::Pending,
            message: String::new(),
            response: None,
            created_at: Utc::now(),
            responded_at: None,
            advisor_id: None,
        }
    }

    #[test]
    fn test_finds_matching_request() {
        let requests = vec![request("r1", "p1"), request("r2", "p2")];
        assert_eq!(request_for_property("p2", &requests).unwrap().id, "r2");
    }

    #[test]
    fn test_no_match() {
        let requests = vec![request("r1", "p1")];
        assert!(request_for_property("p9", &requests).is_none());
        assert!(request_for_property("p1", &[]).is_none());
    }

    #[test]
    fn test_first_in_supplied_order_wins() {
        let requests = vec![request("r1", "p1"), request("r2", "p1"), request("r3", "p1")];
        assert_eq!(request_for_property("p1", &requests).unwrap().id, "r1");

        let reversed: Vec<_> = requests.into_iter().rev().collect();
        assert_eq!(request_for_property("p1", &reversed).unwrap().id, "r3");
    }
}
