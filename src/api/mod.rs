pub mod analytics;
pub mod attendance;
pub mod health;
pub mod leaves;
pub mod meetings;
pub mod notifications;
pub mod roles;
pub mod work;
pub mod workitems;
