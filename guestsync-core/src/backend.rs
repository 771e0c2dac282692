//! The calendar backend seam.
//!
//! The reconciler only talks to calendars through this trait. The provider
//! subprocess client implements it for real calendars; tests use an
//! in-memory implementation.

use async_trait::async_trait;

use crate::date_range::DateRange;
use crate::error::GuestSyncResult;
use crate::event::{Event, GuestStatus, NewEvent};

#[async_trait]
pub trait CalendarBackend: Send + Sync {
    /// Events on `calendar` overlapping `range`. Order is not significant.
    async fn list_events(&self, calendar: &str, range: &DateRange) -> GuestSyncResult<Vec<Event>>;

    /// Re-read a single event. `None` if it no longer exists.
    async fn get_event(&self, event: &Event) -> GuestSyncResult<Option<Event>>;

    /// Set the calendar owner's own response on `event`.
    async fn set_owner_status(&self, event: &Event, status: GuestStatus) -> GuestSyncResult<()>;

    /// Ask the backend to add `identity` as a guest.
    ///
    /// Some backends accept the request and silently drop the guest, so
    /// callers must re-read the event to learn whether it took effect.
    async fn add_guest(&self, event: &Event, identity: &str) -> GuestSyncResult<()>;

    async fn create_event(&self, calendar: &str, event: &NewEvent) -> GuestSyncResult<Event>;

    async fn set_description(&self, event: &Event, description: &str) -> GuestSyncResult<()>;

    async fn delete_event(&self, event: &Event) -> GuestSyncResult<()>;
}
