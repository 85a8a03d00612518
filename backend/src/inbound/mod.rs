//! Inbound adapters: the HTTP surface driving the domain.

pub mod http;
