#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod id;
mod layout;
#[cfg(feature = "readable")]
mod readable;
mod settings;
mod time;
mod timeline;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::layout::*;
#[cfg_attr(docsrs, doc(cfg(feature = "readable")))]
#[cfg(feature = "readable")]
pub use crate::readable::*;
pub use crate::settings::*;
pub use crate::time::*;
pub use crate::timeline::*;
