pub mod auto_refresh;
pub mod debounce;
