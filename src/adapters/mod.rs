pub mod color_state;
pub mod country_loader;
pub mod debounce;
pub mod scope;
pub mod submission_sink;
