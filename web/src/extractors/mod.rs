pub(crate) mod authenticated_caller;
