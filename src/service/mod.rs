pub mod bet_converter;
pub mod error;
pub mod paystack;
pub mod predictions;
pub mod tier;
pub mod vip_service;
