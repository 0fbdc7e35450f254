pub mod dto;
pub mod hateoas;
pub mod mapper;
