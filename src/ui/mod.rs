//! Learning Assistant UI layer.
//!
//! The popup is modelled as a state object driven by method calls; rendering
//! is left to whatever front end hosts it.

pub mod popup;
