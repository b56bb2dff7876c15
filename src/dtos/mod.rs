pub mod matchdtos;
pub mod userdtos;
pub mod vipdtos;
