// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

pub mod constant;
pub mod error;
pub mod geo;
pub mod im;
pub mod io;
pub mod pipeline;
pub mod ut;
