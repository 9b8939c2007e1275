pub mod connection;
pub(crate) mod defaultconnections;
pub mod document;
pub mod documenterror;
pub mod event;
pub mod input;
pub mod lane;
pub mod output;
pub mod processor;
pub mod slotmask;
pub mod track;
pub(crate) mod validation;
pub mod view;
