//! Energy-yield pipeline: flow speed, powercurve, rotor weighting, totals.

pub mod aggregate;
pub mod flow;
pub mod powercurve;
pub mod report;
pub mod rotor;
pub mod velocity;

pub use powercurve::{FittedPowercurve, PowercurveSample};
pub use report::{RotorYield, YieldReport};
pub use rotor::RotorGeometry;
