pub(crate) mod google_sheets_connection;
