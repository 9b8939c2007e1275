mod actiontest;
mod connectiontest;
mod defaultconnectiontest;
mod dragtest;
mod inserttest;
mod movetest;
mod selectiontest;
mod validationtest;
