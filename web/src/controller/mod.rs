pub(crate) mod google_sheets_connection_controller;
pub(crate) mod health_check_controller;
