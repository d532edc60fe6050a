//! Analyzer module - listing quality scoring engine

pub mod engine;
pub mod rules;
pub mod scoring;

pub use engine::ScoringEngine;
pub use scoring::ScoreCalculator;
