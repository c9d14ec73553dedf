//! End-to-end tests: the real router on a random port, a scripted gateway behind it.

mod init_logging;

mod common;
mod discovery;
mod pages;
mod params;
mod share;
