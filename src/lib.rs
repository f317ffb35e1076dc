#![deny(future_incompatible)]
#![deny(nonstandard_style)]
#![deny(clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::many_single_char_names,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::similar_names,
    clippy::too_many_lines,
    clippy::wildcard_imports
)]

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter},
    num::NonZeroU32,
    path::Path,
    time::Instant,
};

use anyhow::{anyhow, bail, ensure, Context, Result};
use nalgebra as na;
use rayon::prelude::*;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[macro_use]
extern crate log;

pub mod aabb;
pub mod camera;
pub mod canvas;
pub mod cfg;
pub mod color;
pub mod grid;
pub mod math;
pub mod mesh;
pub mod obj;
pub mod ray;
pub mod render;
pub mod triangle;

use aabb::*;
use camera::*;
use canvas::*;
use color::*;
use grid::*;
use math::*;
use mesh::*;
use ray::*;
use triangle::*;

