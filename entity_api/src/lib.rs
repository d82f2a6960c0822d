pub use entity::{connection_status, google_sheets_connections, Id};

pub mod error;
pub mod google_sheets_connection;
