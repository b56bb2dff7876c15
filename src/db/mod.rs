pub mod db;
pub mod matchdb;
pub mod userdb;
pub mod vipdb;
