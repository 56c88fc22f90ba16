//! Environment selection and the data it works on.
//!
//! - [`manifest`]: [`Manifest`] and declared [`Environment`]s.
//! - [`apm`]: [`ApmConfig`] and the registry / IPFS gateway override.
//! - [`resolver`]: [`EnvironmentResolver`] and [`ResolutionResult`].

mod apm;
mod manifest;
mod resolver;

pub use self::apm::*;
pub use self::manifest::*;
pub use self::resolver::*;
