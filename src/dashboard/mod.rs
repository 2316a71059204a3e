//! The dashboard core: date context, mode switching, form validation, result
//! rendering, and the controller that sequences them.
//!
//! Nothing here touches the terminal. Front-ends read [`DashboardSession`] and
//! forward user actions to [`DashboardController`].

pub mod chart;
pub mod controller;
pub mod form;
pub mod map;
pub mod mode;
pub mod render;
pub mod temporal;

pub use controller::{Applied, DashboardController, DashboardSession, Phase};
pub use temporal::{Clock, SystemClock, TemporalContextResolver};
