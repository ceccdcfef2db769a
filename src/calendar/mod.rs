//! Calendar primitives and the calendar capability the agent tools
//! consume. The tools only ever see `CalendarApi`; the concrete
//! transport (the service's own events/book API) lives in `client`.

mod interval;
pub use interval::TimeInterval;

mod client;
pub use client::{CalendarApi, CreatedEvent, HttpCalendarApi};
