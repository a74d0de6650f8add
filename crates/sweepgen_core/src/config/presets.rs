//! Built-in sweeps for the Holt's Creek jointvetch model
//!
//! Positional arguments of the model, in order: maximum environmental
//! stochasticity, hydrochory on/off, implantation rate, seed bank rate and,
//! for the adjustment study, the adjustment factor.

use crate::model::{Dimension, ParamValue, ParameterGrid};

/// Named sweep studies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Hydrochory on/off against implantation rate
    Hydrochory,
    /// Environmental stochasticity levels
    Stochasticity,
    /// Adjustment factor as a fifth argument
    Adjustment,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Hydrochory, Preset::Stochasticity, Preset::Adjustment];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Hydrochory => "hydrochory",
            Preset::Stochasticity => "stochasticity",
            Preset::Adjustment => "adjustment",
        }
    }

    pub fn grid(self) -> ParameterGrid {
        match self {
            Preset::Hydrochory => hydrochory(),
            Preset::Stochasticity => stochasticity(),
            Preset::Adjustment => adjustment(),
        }
    }
}

pub fn hydrochory() -> ParameterGrid {
    ParameterGrid::default()
        .with_dimension(Dimension::ints("stochasticity", [2]))
        .with_dimension(Dimension::bools("hydrochory", [true, false]))
        .with_dimension(Dimension::floats(
            "implantation",
            [0.0005, 0.001, 0.002, 0.005, 0.01, 0.02, 0.03, 0.05, 0.1],
        ))
        .with_dimension(Dimension::ints("seed_bank", [0]))
}

pub fn stochasticity() -> ParameterGrid {
    // Whole levels render without a decimal point
    let levels = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0]
        .into_iter()
        .map(|level: f64| {
            if level.fract() == 0.0 {
                ParamValue::int(level as i64)
            } else {
                ParamValue::float(level)
            }
        })
        .collect();

    ParameterGrid::default()
        .with_dimension(Dimension::named("stochasticity", levels))
        .with_dimension(Dimension::bools("hydrochory", [true]))
        .with_dimension(Dimension::floats("implantation", [0.0005]))
        .with_dimension(Dimension::ints("seed_bank", [0]))
}

pub fn adjustment() -> ParameterGrid {
    ParameterGrid::default()
        .with_dimension(Dimension::ints("stochasticity", [2]))
        .with_dimension(Dimension::bools("hydrochory", [true]))
        .with_dimension(Dimension::floats("implantation", [0.0005]))
        .with_dimension(Dimension::ints("seed_bank", [0]))
        .with_dimension(Dimension::floats(
            "adjustment",
            [0.175, 0.1775, 0.18, 0.1825, 0.185],
        ))
}

/// Classpath of the model and its MASON/GeoMASON dependencies, relative to
/// the directory the batches are run from
pub fn jointvetch_classpath() -> Vec<String> {
    [
        "../jointvetch/",
        "../lib/mason/jar/mason.17.jar",
        "../lib/geomason-1.5/geomason.1.5.jar",
        "../lib/jts-1.13/lib/jts-1.13.jar",
        "../lib/mason/itext-1.2.jar",
        "../lib/mason/jcommon-1.0.21.jar",
        "../lib/mason/jmf.jar",
        "../lib/mason/portfolio.jar",
        "../lib/mason/jfreechart-1.0.17.jar",
        "../lib/commons-math3-3.2/commons-math3-3.2.jar",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
