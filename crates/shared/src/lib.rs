//! Types shared by the gesture remote and the control service it drives.

pub mod domain;
pub mod error;
pub mod protocol;
