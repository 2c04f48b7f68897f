// Booking service collaborators for the booking flow
// The three backend calls the wizard depends on, behind a trait so the flow can be
// tested against a fake and the site can run against the timed simulation

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::domain::{
    BookingConfirmation, BookingRecord, BookingSelection, BookingStatus, PropertyInfo, RoomOption,
    SearchCriteria,
};

// Generic collaborator failures; the Display text doubles as the user-visible
// retry prompt surfaced by the flow controller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Failed to get property availability. Please try again.")]
    AvailabilityLookup,

    #[error("Failed to get booking preview. Please try again.")]
    BookingPreview,

    #[error("Failed to create booking. Please try again.")]
    BookingCreation,
}

// The three external calls of the booking flow. Each is asynchronous, single-shot,
// never retried and never cancelled; the controller awaits one at a time.
#[async_trait]
pub trait BookingService: Send + Sync + 'static {
    // Room options for the given stay window, totals priced for its nights
    async fn fetch_available_rooms(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<RoomOption>, ServiceError>;

    // Unpersisted summary of the prospective booking shown before submission
    async fn fetch_booking_preview(
        &self,
        selection: &BookingSelection,
    ) -> Result<BookingRecord, ServiceError>;

    // Final submission; yields the opaque confirmation the guest keeps
    async fn submit_booking(
        &self,
        record: &BookingRecord,
    ) -> Result<BookingConfirmation, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct MockServiceConfig {
    // Artificial latency applied to every call; zero in tests
    pub latency: Duration,
}

impl Default for MockServiceConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1000),
        }
    }
}

// Call counters for the simulated backend
#[derive(Debug, Default)]
pub struct ServiceStats {
    pub availability_calls: AtomicUsize,
    pub preview_calls: AtomicUsize,
    pub booking_calls: AtomicUsize,
    pub injected_failures: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStatsReport {
    pub availability_calls: usize,
    pub preview_calls: usize,
    pub booking_calls: usize,
    pub injected_failures: usize,
}

// The simulated backend the site actually runs: canned room catalog, fixed
// property details, artificial latency. Failures only happen when a test arms
// them via fail_next_requests.
pub struct MockLodgeService {
    config: MockServiceConfig,
    property: PropertyInfo,
    fail_next: Mutex<u32>,
    stats: ServiceStats,
}

impl MockLodgeService {
    pub fn new(config: MockServiceConfig) -> Self {
        Self {
            config,
            property: PropertyInfo::talek_bush_camp(),
            fail_next: Mutex::new(0),
            stats: ServiceStats::default(),
        }
    }

    pub fn property(&self) -> &PropertyInfo {
        &self.property
    }

    // Arm the next `count` calls to fail, whichever operations they are
    pub fn fail_next_requests(&self, count: u32) {
        *self.fail_next.lock() = count;
    }

    pub fn stats(&self) -> ServiceStatsReport {
        ServiceStatsReport {
            availability_calls: self.stats.availability_calls.load(Ordering::SeqCst),
            preview_calls: self.stats.preview_calls.load(Ordering::SeqCst),
            booking_calls: self.stats.booking_calls.load(Ordering::SeqCst),
            injected_failures: self.stats.injected_failures.load(Ordering::SeqCst),
        }
    }

    fn take_injected_failure(&self) -> bool {
        let mut remaining = self.fail_next.lock();
        if *remaining > 0 {
            *remaining -= 1;
            self.stats.injected_failures.fetch_add(1, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    // The lodge's room types. Totals are per-night price times the window's nights.
    fn room_catalog(&self, nights: u32) -> Vec<RoomOption> {
        let priced = |per_night: f64| per_night * f64::from(nights);
        vec![
            RoomOption {
                id: "room1".to_string(),
                name: "Standard Safari Tent".to_string(),
                description: "Comfortable tent with queen bed and en-suite bathroom".to_string(),
                price_per_night: 120.0,
                total_price: priced(120.0),
                max_guests: 2,
                amenities: vec![
                    "En-suite bathroom".to_string(),
                    "Hot water".to_string(),
                    "Mosquito nets".to_string(),
                ],
                cancellation_policy: "Free cancellation up to 24 hours before arrival".to_string(),
            },
            RoomOption {
                id: "room2".to_string(),
                name: "Deluxe Safari Tent".to_string(),
                description: "Spacious tent with king bed and private veranda".to_string(),
                price_per_night: 180.0,
                total_price: priced(180.0),
                max_guests: 2,
                amenities: vec![
                    "En-suite bathroom".to_string(),
                    "Hot water".to_string(),
                    "Mosquito nets".to_string(),
                    "Private veranda".to_string(),
                ],
                cancellation_policy: "Free cancellation up to 24 hours before arrival".to_string(),
            },
            RoomOption {
                id: "room3".to_string(),
                name: "Family Room".to_string(),
                description: "Family unit with two queen beds sleeping up to five guests"
                    .to_string(),
                price_per_night: 250.0,
                total_price: priced(250.0),
                max_guests: 5,
                amenities: vec![
                    "En-suite bathroom".to_string(),
                    "Hot water".to_string(),
                    "Mosquito nets".to_string(),
                    "Separate sitting area".to_string(),
                ],
                cancellation_policy: "Free cancellation up to 24 hours before arrival".to_string(),
            },
        ]
    }
}

impl Default for MockLodgeService {
    fn default() -> Self {
        Self::new(MockServiceConfig::default())
    }
}

#[async_trait]
impl BookingService for MockLodgeService {
    async fn fetch_available_rooms(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<RoomOption>, ServiceError> {
        self.stats.availability_calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.config.latency).await;

        if self.take_injected_failure() {
            return Err(ServiceError::AvailabilityLookup);
        }

        let nights = criteria.nights();
        debug!(nights, adults = criteria.adults, children = criteria.children, "availability lookup");
        Ok(self.room_catalog(nights))
    }

    async fn fetch_booking_preview(
        &self,
        selection: &BookingSelection,
    ) -> Result<BookingRecord, ServiceError> {
        self.stats.preview_calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.config.latency).await;

        if self.take_injected_failure() {
            return Err(ServiceError::BookingPreview);
        }

        let check_in = selection.criteria.check_in.ok_or(ServiceError::BookingPreview)?;
        let check_out = selection.criteria.check_out.ok_or(ServiceError::BookingPreview)?;

        Ok(BookingRecord {
            property_id: selection.property_id.clone(),
            room_id: selection.room.id.clone(),
            check_in,
            check_out,
            adults: selection.criteria.adults,
            children: selection.criteria.children,
            traveler: selection.traveler.clone(),
            payment: selection.payment.clone(),
            total_price: selection.room.total_price,
            nights: selection.criteria.nights(),
        })
    }

    async fn submit_booking(
        &self,
        record: &BookingRecord,
    ) -> Result<BookingConfirmation, ServiceError> {
        self.stats.booking_calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.config.latency).await;

        if self.take_injected_failure() {
            return Err(ServiceError::BookingCreation);
        }

        let confirmation = BookingConfirmation {
            booking_id: format!("BK{}", rand::random::<u32>() % 10_000),
            status: BookingStatus::Confirmed,
            property: self.property.clone(),
        };
        info!(
            booking_id = %confirmation.booking_id,
            total_price = record.total_price,
            nights = record.nights,
            "booking created"
        );
        Ok(confirmation)
    }
}
