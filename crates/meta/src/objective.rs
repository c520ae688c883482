//! Pure translation of business objectives into platform vocabulary.

/// Map a business objective to the platform's OUTCOME_* naming. Unknown
/// inputs pass through unchanged: they are assumed to already be
/// platform-native values, and the platform rejects invalid ones itself.
pub fn map_to_outcome_objective(objective: &str) -> &str {
    match objective {
        "LEAD_GENERATION" => "OUTCOME_LEADS",
        "ENGAGEMENT" => "OUTCOME_ENGAGEMENT",
        "LINK_CLICKS" => "OUTCOME_TRAFFIC",
        "AWARENESS" => "OUTCOME_AWARENESS",
        other => other,
    }
}

/// Ad-set delivery parameters derived from the raw (un-mapped) objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliverySpec {
    pub optimization_goal: &'static str,
    pub billing_event: &'static str,
}

/// Lead generation optimizes for leads billed on impressions; every other
/// objective falls back to link clicks for both.
pub fn delivery_spec(objective: &str) -> DeliverySpec {
    if objective == "LEAD_GENERATION" {
        DeliverySpec {
            optimization_goal: "LEAD_GENERATION",
            billing_event: "IMPRESSIONS",
        }
    } else {
        DeliverySpec {
            optimization_goal: "LINK_CLICKS",
            billing_event: "LINK_CLICKS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_objectives_map_to_outcome_values() {
        assert_eq!(map_to_outcome_objective("LEAD_GENERATION"), "OUTCOME_LEADS");
        assert_eq!(map_to_outcome_objective("ENGAGEMENT"), "OUTCOME_ENGAGEMENT");
        assert_eq!(map_to_outcome_objective("LINK_CLICKS"), "OUTCOME_TRAFFIC");
        assert_eq!(map_to_outcome_objective("AWARENESS"), "OUTCOME_AWARENESS");
    }

    #[test]
    fn test_unknown_objective_passes_through() {
        assert_eq!(
            map_to_outcome_objective("OUTCOME_SALES"),
            "OUTCOME_SALES"
        );
        assert_eq!(map_to_outcome_objective(""), "");
    }

    #[test]
    fn test_lead_generation_delivery() {
        let spec = delivery_spec("LEAD_GENERATION");
        assert_eq!(spec.optimization_goal, "LEAD_GENERATION");
        assert_eq!(spec.billing_event, "IMPRESSIONS");
    }

    #[test]
    fn test_other_objectives_bill_on_link_clicks() {
        for objective in ["ENGAGEMENT", "LINK_CLICKS", "AWARENESS", "ANYTHING"] {
            let spec = delivery_spec(objective);
            assert_eq!(spec.optimization_goal, "LINK_CLICKS");
            assert_eq!(spec.billing_event, "LINK_CLICKS");
        }
    }
}
