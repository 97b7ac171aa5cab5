pub mod dashboard_dto;
pub mod session_dto;
