pub mod attendance;
pub mod leave_request;
pub mod meeting;
pub mod notification;
pub mod role;
pub mod user;
pub mod work;
pub mod workitem;
