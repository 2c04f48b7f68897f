// Core library for the Talek Bush Camp booking site

pub mod auth;
pub mod booking_flow;
pub mod chat;
pub mod domain;
pub mod services;
pub mod session;

// Re-export key types for convenience
pub use auth::{AuthConfig, AuthError, AuthGate, AuthService, User, SESSION_KEY};
pub use booking_flow::{BookingFlow, BookingStep, FlowError, ValidationError};
pub use chat::{ChatConfig, ChatMessage, ChatResponder, ChatSession, Sender};
pub use domain::{
    BookingConfirmation, BookingRecord, BookingSelection, BookingStatus, PaymentDetails,
    PaymentMethod, PropertyInfo, RoomOption, SearchCriteria, TravelerDetails,
};
pub use services::{
    BookingService, MockLodgeService, MockServiceConfig, ServiceError, ServiceStatsReport,
};
pub use session::{InMemorySessionStore, SessionStore, SessionStoreStats};
