// Booking flow controller
// Drives the three-step wizard from stay selection through payment to the
// confirmation screen. Holds the working state of one prospective booking and
// owns the calls to the booking service; every advance is re-validated from
// scratch and blocked errors are kept for the caller to display.

use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::AuthGate;
use crate::domain::{
    BookingConfirmation, BookingRecord, BookingSelection, PaymentDetails, PropertyInfo, RoomOption,
    SearchCriteria, TravelerDetails, MAX_ADULTS, MAX_CHILDREN, MIN_ADULTS,
};
use crate::services::{BookingService, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    SelectAndDetails,
    Payment,
    Confirmation,
}

// Guest-facing validation failures raised when an advance is attempted with
// incomplete state
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select check-in and check-out dates")]
    MissingDates,

    #[error("Please select a room")]
    NoRoomSelected,

    #[error("Please fill in all required traveler details")]
    IncompleteTravelerDetails,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Please sign in to continue with your booking")]
    SignInRequired,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub struct BookingFlow<S: BookingService> {
    service: S,
    auth: Arc<dyn AuthGate>,
    property: PropertyInfo,
    step: BookingStep,
    criteria: SearchCriteria,
    available_rooms: Vec<RoomOption>,
    selected_room: Option<RoomOption>,
    traveler: TravelerDetails,
    payment: PaymentDetails,
    preview: Option<BookingRecord>,
    confirmation: Option<BookingConfirmation>,
    last_error: Option<FlowError>,
}

impl<S: BookingService> BookingFlow<S> {
    pub fn new(service: S, auth: Arc<dyn AuthGate>) -> Self {
        Self {
            service,
            auth,
            property: PropertyInfo::talek_bush_camp(),
            step: BookingStep::SelectAndDetails,
            criteria: SearchCriteria::default(),
            available_rooms: Vec::new(),
            selected_room: None,
            traveler: TravelerDetails::default(),
            payment: PaymentDetails::default(),
            preview: None,
            confirmation: None,
            last_error: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn available_rooms(&self) -> &[RoomOption] {
        &self.available_rooms
    }

    pub fn selected_room(&self) -> Option<&RoomOption> {
        self.selected_room.as_ref()
    }

    pub fn traveler(&self) -> &TravelerDetails {
        &self.traveler
    }

    pub fn payment(&self) -> &PaymentDetails {
        &self.payment
    }

    pub fn preview(&self) -> Option<&BookingRecord> {
        self.preview.as_ref()
    }

    pub fn confirmation(&self) -> Option<&BookingConfirmation> {
        self.confirmation.as_ref()
    }

    pub fn last_error(&self) -> Option<&FlowError> {
        self.last_error.as_ref()
    }

    pub fn property(&self) -> &PropertyInfo {
        &self.property
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn set_check_in(&mut self, date: Option<NaiveDate>) {
        self.criteria.check_in = date;
        self.dates_changed().await;
    }

    pub async fn set_check_out(&mut self, date: Option<NaiveDate>) {
        self.criteria.check_out = date;
        self.dates_changed().await;
    }

    pub async fn set_dates(&mut self, check_in: NaiveDate, check_out: NaiveDate) {
        self.criteria.check_in = Some(check_in);
        self.criteria.check_out = Some(check_out);
        self.dates_changed().await;
    }

    // A changed stay window invalidates the room list, the selection and any
    // preview priced for the old nights. Fresh availability is only fetched
    // once the window spans at least one night.
    async fn dates_changed(&mut self) {
        self.last_error = None;
        self.available_rooms.clear();
        self.selected_room = None;
        self.preview = None;

        if self.criteria.nights() == 0 {
            return;
        }
        match self.service.fetch_available_rooms(&self.criteria).await {
            Ok(rooms) => {
                debug!(count = rooms.len(), nights = self.criteria.nights(), "availability refreshed");
                self.available_rooms = rooms;
            }
            Err(err) => {
                warn!(error = %err, "availability refresh failed");
                self.last_error = Some(err.into());
            }
        }
    }

    pub fn add_adult(&mut self) {
        self.criteria.adults = (self.criteria.adults + 1).min(MAX_ADULTS);
    }

    pub fn remove_adult(&mut self) {
        self.criteria.adults = self.criteria.adults.saturating_sub(1).max(MIN_ADULTS);
    }

    pub fn add_child(&mut self) {
        self.criteria.children = (self.criteria.children + 1).min(MAX_CHILDREN);
    }

    pub fn remove_child(&mut self) {
        self.criteria.children = self.criteria.children.saturating_sub(1);
    }

    // Pick a room from the current availability list. Returns false when the
    // id is not on offer.
    pub fn select_room(&mut self, room_id: &str) -> bool {
        let Some(room) = self.available_rooms.iter().find(|r| r.id == room_id) else {
            return false;
        };
        debug!(room_id, "room selected");
        self.selected_room = Some(room.clone());
        self.preview = None;
        true
    }

    pub fn set_traveler(&mut self, traveler: TravelerDetails) {
        self.traveler = traveler;
    }

    pub fn set_payment(&mut self, payment: PaymentDetails) {
        self.payment = payment;
    }

    // Try to move to the next step. On failure the step is unchanged and the
    // error is also retained in last_error for display.
    pub async fn advance(&mut self) -> Result<BookingStep, FlowError> {
        self.last_error = None;
        let result = self.try_advance().await;
        if let Err(err) = &result {
            warn!(error = %err, step = ?self.step, "advance blocked");
            self.last_error = Some(err.clone());
        }
        result
    }

    async fn try_advance(&mut self) -> Result<BookingStep, FlowError> {
        if !self.auth.is_signed_in() {
            return Err(FlowError::SignInRequired);
        }

        match self.step {
            BookingStep::SelectAndDetails => {
                if !self.criteria.has_dates() {
                    return Err(ValidationError::MissingDates.into());
                }
                let room = self
                    .selected_room
                    .clone()
                    .ok_or(ValidationError::NoRoomSelected)?;
                if !self.traveler.is_complete() {
                    return Err(ValidationError::IncompleteTravelerDetails.into());
                }

                let selection = BookingSelection {
                    property_id: self.property.id.clone(),
                    criteria: self.criteria.clone(),
                    room,
                    traveler: self.traveler.clone(),
                    payment: self.payment.clone(),
                };
                let record = self.service.fetch_booking_preview(&selection).await?;
                info!(total_price = record.total_price, nights = record.nights, "proceeding to payment");
                self.preview = Some(record);
                self.step = BookingStep::Payment;
            }
            BookingStep::Payment => {
                let Some(record) = self.preview.clone() else {
                    return Err(ValidationError::NoRoomSelected.into());
                };
                let confirmation = self.service.submit_booking(&record).await?;
                info!(booking_id = %confirmation.booking_id, "booking confirmed");
                self.confirmation = Some(confirmation);
                self.step = BookingStep::Confirmation;
            }
            BookingStep::Confirmation => {}
        }
        Ok(self.step)
    }

    // Step back from payment to the selection form, keeping everything entered
    pub fn back(&mut self) {
        if self.step == BookingStep::Payment {
            self.step = BookingStep::SelectAndDetails;
            self.last_error = None;
        }
    }

    // Restore the wizard to its initial state for a new booking
    pub fn reset(&mut self) {
        self.step = BookingStep::SelectAndDetails;
        self.criteria = SearchCriteria::default();
        self.available_rooms.clear();
        self.selected_room = None;
        self.traveler = TravelerDetails::default();
        self.payment = PaymentDetails::default();
        self.preview = None;
        self.confirmation = None;
        self.last_error = None;
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }
}
