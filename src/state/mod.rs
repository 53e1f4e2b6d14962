//! View state primitives shared by every view.

mod notice;
mod request;

pub use notice::{Notice, NoticeKind, Notices};
pub use request::{RequestSequencer, RequestState, Ticket};
