pub mod home_controller;
pub mod member_controller;
pub mod repository_controller;
