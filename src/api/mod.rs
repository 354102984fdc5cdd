pub mod config_dto;
pub mod decision_dto;
