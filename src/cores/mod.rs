// Copyright (c) 2024 Mike Tsao

//! Basic musical devices. Effects transform [Signal](crate::elements::Signal)s
//! in place; instruments render new ones.

pub use effects::*;
pub use instruments::*;

mod effects;
mod instruments;
