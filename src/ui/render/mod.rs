mod all;
mod dashboard;
mod departments;
mod footer;
mod header;
mod log;
mod main;
mod people;
mod reports;

use self::log::log;
use super::*;
use footer::footer;
use header::header;
use main::main;

pub use all::all as render;
