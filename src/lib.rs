// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

//! ShotML
//!
//! A data-driven bullet pattern engine: shot templates loaded from definition files and a
//! per-frame interpreter which steps, spawns and retires shot instances.

#![warn(missing_docs)]

pub mod data;
pub mod run;
