pub mod config;
pub mod issue_code;
pub mod resend_code;
pub mod verify_code;
