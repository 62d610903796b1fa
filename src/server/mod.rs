pub mod route_builder;
