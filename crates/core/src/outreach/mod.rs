mod error;
mod types;

pub use error::OutreachError;
pub use types::{
    borehole_view, Borehole, BoreholeInput, BoreholeView, Ticket, TicketInput,
    DEFAULT_TICKET_STATUS,
};
