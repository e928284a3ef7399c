//! Asset loading for level geometry and materials
//!
//! - [`ObjLoader`] turns Wavefront OBJ text into a [`Mesh`](crate::render::Mesh)
//! - [`MtlParser`] reads the material libraries an OBJ references

pub mod obj_loader;
pub mod materials;

pub use obj_loader::{ObjError, ObjLoader};
pub use materials::{MtlData, MtlError, MtlParser};
