pub mod use_observable;

pub use use_observable::use_observable;
