//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima. Scores are maximized.
//!
//! The pieces are independent: a [`TemperatureFunction`] maps progress to
//! a temperature in `[0, 1]`, an [`AcceptanceFunction`] turns a score
//! delta and temperature into a decision, and the [`Annealer`] drives a
//! [`Perturber`](crate::perturb::Perturber) with them.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod acceptance;
mod annealer;
mod temperature;

pub use acceptance::{AcceptanceFunction, AcceptanceKind};
pub use annealer::{AnnealResult, Annealer};
pub use temperature::{TemperatureFunction, TemperatureKind};
