//! Value Object Module

pub mod account_role;
pub mod author_category;
pub mod email;
pub mod full_name;
pub mod otp_code;
