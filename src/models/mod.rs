pub mod matchmodel;
pub mod usermodel;
pub mod vipmodel;
