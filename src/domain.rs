// Core data model for the lodge booking flow
// These types travel between the flow controller, the simulated backend and the rendering layer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Guest count bounds enforced by the search form
pub const MIN_ADULTS: u32 = 1;
pub const MAX_ADULTS: u32 = 10;
pub const MAX_CHILDREN: u32 = 8;

// What the guest is searching for: a stay window plus party size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            check_in: None,
            check_out: None,
            adults: 2,
            children: 0,
        }
    }
}

impl SearchCriteria {
    // Billable nights for the stay window. A missing or inverted date pair is zero
    // nights; with whole dates the ceiling of the day difference is the difference
    // itself (2024-06-01 to 2024-06-04 is 3 nights).
    pub fn nights(&self) -> u32 {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => {
                let days = (check_out - check_in).num_days();
                if days > 0 {
                    days as u32
                } else {
                    0
                }
            }
            _ => 0,
        }
    }

    pub fn has_dates(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_some()
    }

    pub fn total_guests(&self) -> u32 {
        self.adults + self.children
    }
}

// A bookable unit type as returned by the availability lookup. Regenerated
// whenever the search dates change; immutable once fetched until the next search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomOption {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_per_night: f64,
    pub total_price: f64,
    pub max_guests: u32,
    pub amenities: Vec<String>,
    pub cancellation_policy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: String,
}

impl TravelerDetails {
    // Name, email and phone are required before leaving the selection step;
    // special requests stay optional.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "credit_card")]
    Card,
    #[serde(rename = "pay_at_property")]
    PayAtProperty,
}

// Collected as-is; presence is all the flow checks, card numbers are never validated here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub card_number: Option<String>,
    pub card_holder: Option<String>,
    pub expiry_date: Option<String>,
    pub cvv: Option<String>,
}

impl Default for PaymentDetails {
    fn default() -> Self {
        Self {
            method: PaymentMethod::Card,
            card_number: None,
            card_holder: None,
            expiry_date: None,
            cvv: None,
        }
    }
}

// Everything the guest has picked by the end of the selection step; input to
// the booking preview call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSelection {
    pub property_id: String,
    pub criteria: SearchCriteria,
    pub room: RoomOption,
    pub traveler: TravelerDetails,
    pub payment: PaymentDetails,
}

// The unpersisted booking summary shown before final submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub property_id: String,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub traveler: TravelerDetails,
    pub payment: PaymentDetails,
    pub total_price: f64,
    pub nights: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub status: BookingStatus,
    pub property: PropertyInfo,
}

// The single lodge this site sells; echoed back on every confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub id: String,
    pub name: String,
    pub location: String,
    pub contact_info: String,
}

impl PropertyInfo {
    pub fn talek_bush_camp() -> Self {
        Self {
            id: "property1".to_string(),
            name: "Talek Bush Camp".to_string(),
            location: "Masai Mara, Kenya".to_string(),
            contact_info: "info@talekbushcamp.com | +254 123 456 789".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_case(date(2024, 6, 1), date(2024, 6, 4), 3; "three night stay")]
    #[test_case(date(2024, 6, 1), date(2024, 6, 2), 1; "single night")]
    #[test_case(date(2024, 12, 30), date(2025, 1, 2), 3; "across new year")]
    #[test_case(date(2024, 6, 4), date(2024, 6, 4), 0; "same day is zero nights")]
    #[test_case(date(2024, 6, 4), date(2024, 6, 1), 0; "inverted dates are zero nights")]
    fn nights_from_date_pair(check_in: NaiveDate, check_out: NaiveDate, expected: u32) {
        let criteria = SearchCriteria {
            check_in: Some(check_in),
            check_out: Some(check_out),
            ..SearchCriteria::default()
        };
        assert_eq!(criteria.nights(), expected);
    }

    #[test]
    fn nights_require_both_dates() {
        let mut criteria = SearchCriteria::default();
        assert_eq!(criteria.nights(), 0);

        criteria.check_in = Some(date(2024, 6, 1));
        assert_eq!(criteria.nights(), 0);
        assert!(!criteria.has_dates());
    }

    #[test]
    fn default_criteria_is_two_adults_no_children_no_dates() {
        let criteria = SearchCriteria::default();
        assert_eq!(criteria.adults, 2);
        assert_eq!(criteria.children, 0);
        assert!(criteria.check_in.is_none());
        assert!(criteria.check_out.is_none());
        assert_eq!(criteria.total_guests(), 2);
    }

    #[test]
    fn traveler_details_require_name_email_and_phone() {
        let mut traveler = TravelerDetails::default();
        assert!(!traveler.is_complete());

        traveler.name = "Jane Smith".to_string();
        traveler.email = "jane@example.com".to_string();
        assert!(!traveler.is_complete());

        traveler.phone = "+44 7700 900123".to_string();
        assert!(traveler.is_complete());

        // Whitespace-only fields do not count as filled
        traveler.phone = "   ".to_string();
        assert!(!traveler.is_complete());
    }

    #[test]
    fn payment_defaults_to_card_with_no_fields() {
        let payment = PaymentDetails::default();
        assert_eq!(payment.method, PaymentMethod::Card);
        assert!(payment.card_number.is_none());
        assert!(payment.cvv.is_none());
    }

    #[test]
    fn payment_method_serializes_to_snake_case_tags() {
        let json = serde_json::to_string(&PaymentMethod::PayAtProperty).unwrap();
        assert_eq!(json, "\"pay_at_property\"");
        let parsed: PaymentMethod = serde_json::from_str("\"credit_card\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Card);
    }
}
