// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

pub mod composite;
pub mod density;

pub use composite::composite;
pub use density::{Density, read_density};
