pub(in crate::app) mod chat;
mod clusters;
mod details;
mod panels;
pub(in crate::app) mod responsive;
mod search_bar;
