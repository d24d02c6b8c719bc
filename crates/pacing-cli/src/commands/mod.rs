pub mod forecast;
pub mod ratios;
