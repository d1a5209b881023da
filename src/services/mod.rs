pub mod account_service;
pub mod ai_service;
pub mod email_service;
